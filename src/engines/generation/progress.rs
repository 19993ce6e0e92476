use super::evolution_engine::{DiversityAction, ProgressCallback};
use crate::types::GenerationStats;
use std::io::Write;

/// Prints `generation  B:best  W:worst` lines to stdout.
pub struct ConsoleProgressCallback {
    /// Print every n-th generation; the first is always printed.
    pub interval: usize,
}

impl Default for ConsoleProgressCallback {
    fn default() -> Self {
        Self { interval: 1 }
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_population_initialised(&mut self, size: usize) -> anyhow::Result<()> {
        println!("finished initialising population of {}", size);
        Ok(())
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) -> anyhow::Result<()> {
        if stats.generation == 1 || stats.generation % self.interval.max(1) == 0 {
            println!(
                "{}\t B:{:.4} ({:.2})\t W:{:.4} ({:.2})\t N:{}",
                stats.generation,
                stats.best_fitness,
                stats.best_energy_remaining,
                stats.worst_fitness,
                stats.worst_energy_remaining,
                stats.population_size
            );
        }
        Ok(())
    }
}

/// Routes generation stats through the `log` facade.
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_generation_complete(&mut self, stats: &GenerationStats) -> anyhow::Result<()> {
        log::info!(
            "generation {} best {:.4} worst {:.4} size {}",
            stats.generation,
            stats.best_fitness,
            stats.worst_fitness,
            stats.population_size
        );
        Ok(())
    }

    fn on_diversity_maintenance(
        &mut self,
        generation: usize,
        action: DiversityAction,
    ) -> anyhow::Result<()> {
        log::info!("generation {} diversity step: {:?}", generation, action);
        Ok(())
    }
}

/// Writes one JSON object per generation.
pub struct JsonLinesProgressCallback<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesProgressCallback<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ProgressCallback for JsonLinesProgressCallback<W> {
    fn on_generation_complete(&mut self, stats: &GenerationStats) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, stats)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

// For handing progress to another thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    PopulationInitialised(usize),
    GenerationComplete(GenerationStats),
    Diversity { generation: usize, action: DiversityAction },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_population_initialised(&mut self, size: usize) -> anyhow::Result<()> {
        self.sender.send(ProgressMessage::PopulationInitialised(size))?;
        Ok(())
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) -> anyhow::Result<()> {
        self.sender
            .send(ProgressMessage::GenerationComplete(stats.clone()))?;
        Ok(())
    }

    fn on_diversity_maintenance(
        &mut self,
        generation: usize,
        action: DiversityAction,
    ) -> anyhow::Result<()> {
        self.sender
            .send(ProgressMessage::Diversity { generation, action })?;
        Ok(())
    }
}
