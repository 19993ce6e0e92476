use crate::config::{ConfigSection, EvolutionConfig};
use crate::engines::evaluation::{FitnessEvaluator, RaceSimulator};
use crate::engines::generation::{
    genome::Genome,
    operators::{crossover, mutate},
    population::Population,
    selection::select,
};
use crate::error::{PursuitError, Result};
use crate::types::{EvolutionResult, GenerationStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Initializing,
    EvaluatingGeneration,
    Terminated,
}

/// What a sawtooth step did to the population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiversityAction {
    RemovedWorst { fitness: f64 },
    Replenished { added: usize },
}

/// Receives progress from a run. Failures are logged and never abort the run.
pub trait ProgressCallback {
    fn on_population_initialised(&mut self, _size: usize) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) -> anyhow::Result<()>;

    fn on_diversity_maintenance(
        &mut self,
        _generation: usize,
        _action: DiversityAction,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

impl ProgressCallback for () {
    fn on_generation_complete(&mut self, _stats: &GenerationStats) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_population_initialised(&mut self, size: usize) -> anyhow::Result<()> {
        (**self).on_population_initialised(size)
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) -> anyhow::Result<()> {
        (**self).on_generation_complete(stats)
    }

    fn on_diversity_maintenance(
        &mut self,
        generation: usize,
        action: DiversityAction,
    ) -> anyhow::Result<()> {
        (**self).on_diversity_maintenance(generation, action)
    }
}

fn report(result: anyhow::Result<()>, what: &str) {
    if let Err(e) = result {
        log::warn!("Progress report ({}) failed: {:#}", what, e);
    }
}

/// Steady-state EA over pacing/transition plans.
///
/// Each generation selects two parents, breeds a child through crossover and
/// the mutation pipeline, scores it, and lets it replace the current worst
/// member only if it is strictly better. Every `generations / 125`
/// generations the population is either shrunk by its worst member or, once
/// below the floor, topped back up with fresh random plans.
pub struct EvolutionEngine<S: RaceSimulator, R: Rng = StdRng> {
    config: EvolutionConfig,
    simulator: S,
    evaluator: FitnessEvaluator,
    rng: R,
    population: Population,
    segments: usize,
    generation: usize,
    evaluations: usize,
    state: EngineState,
    best_ever: Option<Genome>,
}

impl<S: RaceSimulator> EvolutionEngine<S, StdRng> {
    /// Engine seeded from `config.seed`, or from entropy when unset.
    pub fn new(config: EvolutionConfig, simulator: S) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, simulator, rng)
    }
}

impl<S: RaceSimulator, R: Rng> EvolutionEngine<S, R> {
    pub fn with_rng(config: EvolutionConfig, simulator: S, rng: R) -> Result<Self> {
        config.validate()?;

        let segments = simulator.segment_count();
        if segments == 0 {
            return Err(PursuitError::Configuration(
                "simulator reports zero race segments".to_string(),
            ));
        }

        Ok(Self {
            evaluator: FitnessEvaluator::from_config(&config),
            population: Population::with_capacity(config.population_size),
            config,
            simulator,
            rng,
            segments,
            generation: 0,
            evaluations: 0,
            state: EngineState::Uninitialized,
            best_ever: None,
        })
    }

    /// Run the full generation budget and return the best plan seen.
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<EvolutionResult> {
        if self.state == EngineState::Terminated {
            return Err(PursuitError::Precondition(
                "engine has already finished its run".to_string(),
            ));
        }

        log::info!(
            "Starting evolution: population {}, {} generations, {} segments",
            self.config.population_size,
            self.config.generations,
            self.segments
        );

        self.state = EngineState::Initializing;
        self.initialise_population()?;
        report(
            callback.on_population_initialised(self.population.len()),
            "initialisation",
        );
        let initial_best_fitness = self.best_fitness().unwrap_or(f64::INFINITY);

        self.state = EngineState::EvaluatingGeneration;
        let period = self.config.diversity_period();
        while self.generation < self.config.generations {
            self.step()?;

            if period > 0 && self.generation % period == 0 {
                let action = self.maintain_diversity()?;
                report(
                    callback.on_diversity_maintenance(self.generation, action),
                    "diversity",
                );
            }

            if let Some(stats) = self.population.stats(self.generation) {
                log::debug!(
                    "Generation {}: best {:.4}, worst {:.4}, size {}",
                    stats.generation,
                    stats.best_fitness,
                    stats.worst_fitness,
                    stats.population_size
                );
                report(callback.on_generation_complete(&stats), "generation");
            }
        }
        self.state = EngineState::Terminated;

        let best = self.best_ever.clone().ok_or_else(|| {
            PursuitError::Precondition("run finished without evaluating any genome".to_string())
        })?;
        log::info!(
            "Evolution finished after {} generations ({} evaluations); best fitness {:.4}",
            self.generation,
            self.evaluations,
            best.fitness().unwrap_or(f64::INFINITY)
        );

        Ok(EvolutionResult {
            best,
            initial_best_fitness,
            generations: self.generation,
            evaluations: self.evaluations,
        })
    }

    /// Top the population up to its nominal size with random, scored plans.
    /// Returns how many were added.
    pub fn initialise_population(&mut self) -> Result<usize> {
        let mut added = 0;
        while self.population.len() < self.config.population_size {
            let mut genome =
                Genome::random(self.segments, &self.config.init_pacing_range, &mut self.rng);
            self.score(&mut genome)?;
            self.population.push(genome)?;
            added += 1;
        }
        Ok(added)
    }

    /// One generation: select, breed, score, replace. Returns whether the
    /// child entered the population.
    pub fn step(&mut self) -> Result<bool> {
        self.generation += 1;
        let child = self.breed()?;
        let fitness = child.fitness();
        let admitted = self.population.replace_worst_if_better(child)?;
        log::trace!(
            "Generation {}: child {:?} {}",
            self.generation,
            fitness,
            if admitted { "admitted" } else { "discarded" }
        );
        Ok(admitted)
    }

    fn breed(&mut self) -> Result<Genome> {
        let method = self.config.selection_method;
        let tournament_size = self.config.tournament_size;
        let parent1 = select(method, &self.population, tournament_size, &mut self.rng)?;
        let parent2 = select(method, &self.population, tournament_size, &mut self.rng)?;

        let (mut child, mut sibling) = crossover(
            self.config.crossover_method,
            self.config.crossover_probability,
            &parent1,
            &parent2,
            &mut self.rng,
        )?;

        mutate(&mut child, &self.config, &mut self.rng);
        self.score(&mut child)?;

        if self.config.best_of_two_children {
            mutate(&mut sibling, &self.config, &mut self.rng);
            self.score(&mut sibling)?;
            if sibling.fitness() < child.fitness() {
                child = sibling;
            }
        }
        Ok(child)
    }

    /// Sawtooth step: drop the worst member while the population is at or
    /// above the floor, otherwise refill it to nominal size.
    pub fn maintain_diversity(&mut self) -> Result<DiversityAction> {
        let action = if self.population.len() >= self.config.diversity_floor {
            let removed = self.population.remove_worst().ok_or_else(|| {
                PursuitError::Precondition("diversity step on an empty population".to_string())
            })?;
            DiversityAction::RemovedWorst {
                fitness: removed.fitness().unwrap_or(f64::INFINITY),
            }
        } else {
            DiversityAction::Replenished {
                added: self.initialise_population()?,
            }
        };
        log::debug!("Generation {}: {:?}", self.generation, action);
        Ok(action)
    }

    fn score(&mut self, genome: &mut Genome) -> Result<()> {
        genome.evaluate(&self.evaluator, &self.simulator)?;
        self.evaluations += 1;

        let improves = match &self.best_ever {
            Some(best) => genome.fitness() < best.fitness(),
            None => true,
        };
        if improves {
            self.best_ever = Some(genome.clone());
        }
        Ok(())
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Best plan scored so far, including members since removed.
    pub fn best_ever(&self) -> Option<&Genome> {
        self.best_ever.as_ref()
    }

    fn best_fitness(&self) -> Option<f64> {
        self.population.best().and_then(|g| g.fitness())
    }
}
