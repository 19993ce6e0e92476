use teampursuit::config::ConfigManager;
use teampursuit::engines::evaluation::ReferenceRace;
use teampursuit::engines::generation::{ConsoleProgressCallback, EvolutionEngine};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Optional path to a TOML config; PURSUIT_* variables override it
    let manager = ConfigManager::new();
    if let Some(path) = std::env::args().nth(1) {
        manager.load_from_file(&path)?;
    }
    let config = manager.get()?;

    let interval = (config.evolution.generations / 100).max(1);
    let race = ReferenceRace::new(config.race);
    let mut engine = EvolutionEngine::new(config.evolution, race)?;

    let result = engine.run(ConsoleProgressCallback { interval })?;

    println!(
        "\nbest after {} generations ({} evaluations, initial best {:.4}):",
        result.generations, result.evaluations, result.initial_best_fitness
    );
    println!("{}", result.best);
    Ok(())
}
