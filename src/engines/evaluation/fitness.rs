use super::simulator::RaceSimulator;
use crate::config::EvolutionConfig;
use crate::engines::generation::genome::Genome;
use crate::error::{PursuitError, Result};
use crate::types::Evaluation;

/// Turns a simulated race into a scalar fitness (lower is better).
///
/// A finished race scores `time - energy_weight * energy_remaining`, so two
/// plans with equal times are separated by the reserve they leave. A race
/// that does not finish scores the flat `penalty`, however far it got.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessEvaluator {
    pub energy_weight: f64,
    pub penalty: f64,
}

impl Default for FitnessEvaluator {
    fn default() -> Self {
        Self {
            energy_weight: 0.0,
            penalty: 1000.0,
        }
    }
}

impl FitnessEvaluator {
    pub fn new(energy_weight: f64, penalty: f64) -> Self {
        Self { energy_weight, penalty }
    }

    pub fn from_config(config: &EvolutionConfig) -> Self {
        Self::new(config.energy_weight, config.penalty_fitness)
    }

    pub fn evaluate<S: RaceSimulator>(&self, genome: &Genome, simulator: &S) -> Result<Evaluation> {
        let segments = simulator.segment_count();
        if genome.len() != segments {
            return Err(PursuitError::Precondition(format!(
                "genome has {} segments, simulator expects {}",
                genome.len(),
                segments
            )));
        }

        let outcome = simulator.simulate(genome.pacing(), genome.transitions())?;

        if !outcome.completed {
            return Ok(Evaluation {
                fitness: self.penalty,
                energy_remaining: outcome.energy_remaining,
                completed: false,
            });
        }

        if !outcome.time.is_finite() || !outcome.energy_remaining.is_finite() {
            return Err(PursuitError::Simulator(format!(
                "non-finite result for a completed race: time {}, energy {}",
                outcome.time, outcome.energy_remaining
            )));
        }

        Ok(Evaluation {
            fitness: outcome.time - self.energy_weight * outcome.energy_remaining,
            energy_remaining: outcome.energy_remaining,
            completed: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RaceOutcome;

    struct FixedRace {
        outcome: RaceOutcome,
    }

    impl RaceSimulator for FixedRace {
        fn segment_count(&self) -> usize {
            4
        }

        fn simulate(&self, _pacing: &[i32], _transitions: &[bool]) -> Result<RaceOutcome> {
            Ok(self.outcome)
        }
    }

    struct BrokenRace;

    impl RaceSimulator for BrokenRace {
        fn segment_count(&self) -> usize {
            4
        }

        fn simulate(&self, _pacing: &[i32], _transitions: &[bool]) -> Result<RaceOutcome> {
            Err(PursuitError::Simulator("model diverged".to_string()))
        }
    }

    fn plan() -> Genome {
        Genome::from_strategies(vec![300; 4], vec![false; 4]).unwrap()
    }

    #[test]
    fn test_completed_race_scores_time() {
        let sim = FixedRace {
            outcome: RaceOutcome { completed: true, time: 245.5, energy_remaining: 12.0 },
        };
        let evaluation = FitnessEvaluator::default().evaluate(&plan(), &sim).unwrap();
        assert_eq!(evaluation.fitness, 245.5);
        assert_eq!(evaluation.energy_remaining, 12.0);
        assert!(evaluation.completed);
    }

    #[test]
    fn test_energy_bonus_lowers_fitness() {
        let sim = FixedRace {
            outcome: RaceOutcome { completed: true, time: 250.0, energy_remaining: 20.0 },
        };
        let evaluator = FitnessEvaluator::new(0.1, 1000.0);
        let evaluation = evaluator.evaluate(&plan(), &sim).unwrap();
        assert!((evaluation.fitness - 248.0).abs() < 1e-9);
    }

    #[test]
    fn test_unfinished_race_gets_flat_penalty() {
        let sim = FixedRace {
            outcome: RaceOutcome { completed: false, time: 12.0, energy_remaining: -3.0 },
        };
        let evaluation = FitnessEvaluator::default().evaluate(&plan(), &sim).unwrap();
        assert_eq!(evaluation.fitness, 1000.0);
        assert!(!evaluation.completed);
    }

    #[test]
    fn test_simulator_failure_propagates() {
        let result = FitnessEvaluator::default().evaluate(&plan(), &BrokenRace);
        assert!(matches!(result, Err(PursuitError::Simulator(_))));
    }

    #[test]
    fn test_length_mismatch_is_precondition_error() {
        let sim = FixedRace {
            outcome: RaceOutcome { completed: true, time: 1.0, energy_remaining: 0.0 },
        };
        let short = Genome::from_strategies(vec![300; 3], vec![false; 3]).unwrap();
        let result = FitnessEvaluator::default().evaluate(&short, &sim);
        assert!(matches!(result, Err(PursuitError::Precondition(_))));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let sim = FixedRace {
            outcome: RaceOutcome { completed: true, time: 230.0, energy_remaining: 4.0 },
        };
        let evaluator = FitnessEvaluator::new(0.5, 1000.0);
        let first = evaluator.evaluate(&plan(), &sim).unwrap();
        let second = evaluator.evaluate(&plan(), &sim).unwrap();
        assert_eq!(first, second);
    }
}
