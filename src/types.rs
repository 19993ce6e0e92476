use serde::{Deserialize, Serialize};

use crate::engines::generation::genome::Genome;

/// What a race simulator reports for one pacing/transition plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceOutcome {
    pub completed: bool,
    /// Total race time in seconds.
    pub time: f64,
    pub energy_remaining: f64,
}

/// Score attached to a genome once it has been run through the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub fitness: f64,
    pub energy_remaining: f64,
    pub completed: bool,
}

/// Per-generation report record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub best_energy_remaining: f64,
    pub worst_fitness: f64,
    pub worst_energy_remaining: f64,
    pub population_size: usize,
}

/// Outcome of a complete run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Best genome admitted at any point in the run.
    pub best: Genome,
    pub initial_best_fitness: f64,
    pub generations: usize,
    pub evaluations: usize,
}
