use super::traits::ConfigSection;
use crate::error::PursuitError;
use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeInclusive};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Chance that each operator in the mutation pipeline fires for a child.
    pub mutation_probability: f64,
    /// Upper bound on positions touched by a point mutation.
    pub mutation_rate_max: usize,
    pub crossover_probability: f64,
    pub tournament_size: usize,
    /// Range used for random initialisation and point mutation.
    pub init_pacing_range: Range<i32>,
    /// Physical bounds the creep mutation steers values back into.
    pub pacing_bounds: RangeInclusive<i32>,
    pub creep_delta: i32,
    pub creep_step: i32,
    pub selection_method: SelectionMethod,
    pub crossover_method: CrossoverMethod,
    /// Applied in order, each gated independently.
    pub mutation_pipeline: Vec<MutationOperator>,
    pub best_of_two_children: bool,
    /// Weight of leftover energy subtracted from completion time.
    pub energy_weight: f64,
    pub penalty_fitness: f64,
    pub diversity_floor: usize,
    pub diversity_divisor: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMethod {
    Roulette,
    Tournament,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverMethod {
    Uniform,
    OnePoint,
    TwoPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationOperator {
    Point,
    Scramble,
    Creep,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 1,
            generations: 1000,
            mutation_probability: 1.0,
            mutation_rate_max: 3,
            crossover_probability: 1.0,
            tournament_size: 2,
            init_pacing_range: 200..700,
            pacing_bounds: 200..=1200,
            creep_delta: 50,
            creep_step: 50,
            selection_method: SelectionMethod::Roulette,
            crossover_method: CrossoverMethod::Uniform,
            mutation_pipeline: vec![
                MutationOperator::Point,
                MutationOperator::Scramble,
                MutationOperator::Creep,
            ],
            best_of_two_children: false,
            energy_weight: 0.0,
            penalty_fitness: 1000.0,
            diversity_floor: 10,
            diversity_divisor: 125,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Generations between sawtooth steps; zero disables them.
    pub fn diversity_period(&self) -> usize {
        self.generations / self.diversity_divisor.max(1)
    }

    /// Smallest population the sawtooth can shrink to.
    pub fn min_population_size(&self) -> usize {
        if self.population_size >= self.diversity_floor {
            self.diversity_floor - 1
        } else {
            self.population_size
        }
    }
}

fn check_probability(name: &str, value: f64) -> Result<(), PursuitError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PursuitError::Configuration(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(())
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), PursuitError> {
        if self.population_size < 1 {
            return Err(PursuitError::Configuration(
                "Population size must be at least 1".to_string()
            ));
        }
        if self.generations < 1 {
            return Err(PursuitError::Configuration(
                "Generation budget must be at least 1".to_string()
            ));
        }
        check_probability("Mutation probability", self.mutation_probability)?;
        check_probability("Crossover probability", self.crossover_probability)?;
        if self.mutation_rate_max < 1 {
            return Err(PursuitError::Configuration(
                "Mutation rate upper bound must be at least 1".to_string()
            ));
        }
        if self.init_pacing_range.is_empty() || self.pacing_bounds.is_empty() {
            return Err(PursuitError::Configuration(
                "Pacing ranges must not be empty".to_string()
            ));
        }
        if self.init_pacing_range.start < *self.pacing_bounds.start()
            || self.init_pacing_range.end - 1 > *self.pacing_bounds.end()
        {
            return Err(PursuitError::Configuration(format!(
                "Initial pacing range {:?} lies outside pacing bounds {:?}",
                self.init_pacing_range, self.pacing_bounds
            )));
        }
        if self.creep_delta < 0 || self.creep_step < 1 {
            return Err(PursuitError::Configuration(
                "Creep delta must be non-negative and creep step positive".to_string()
            ));
        }
        let bounds_width =
            i64::from(*self.pacing_bounds.end()) - i64::from(*self.pacing_bounds.start());
        if i64::from(self.creep_delta) > bounds_width
            || i64::from(self.creep_step) > bounds_width
        {
            return Err(PursuitError::Configuration(format!(
                "Creep delta {} and step {} must not exceed the pacing bounds width {}",
                self.creep_delta, self.creep_step, bounds_width
            )));
        }
        if self.diversity_floor < 2 || self.diversity_divisor < 1 {
            return Err(PursuitError::Configuration(
                "Diversity floor must be at least 2 and divisor at least 1".to_string()
            ));
        }
        if self.selection_method == SelectionMethod::Tournament {
            if self.tournament_size < 1 {
                return Err(PursuitError::Configuration(
                    "Tournament size must be at least 1".to_string()
                ));
            }
            if self.tournament_size > self.min_population_size() {
                return Err(PursuitError::Configuration(format!(
                    "Tournament size {} exceeds the smallest population size {}",
                    self.tournament_size,
                    self.min_population_size()
                )));
            }
        }
        if !self.energy_weight.is_finite() || !self.penalty_fitness.is_finite() {
            return Err(PursuitError::Configuration(
                "Energy weight and penalty fitness must be finite".to_string()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_population() {
        let config = EvolutionConfig { population_size: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(PursuitError::Configuration(_))));
    }

    #[test]
    fn test_rejects_zero_generations() {
        let config = EvolutionConfig { generations: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let config = EvolutionConfig { mutation_probability: 1.5, ..Default::default() };
        assert!(config.validate().is_err());

        let config = EvolutionConfig { crossover_probability: -0.1, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_init_range_outside_bounds() {
        let config = EvolutionConfig {
            init_pacing_range: 100..700,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tournament_must_fit_smallest_population() {
        // 20 individuals shrink to 9 under the sawtooth
        let config = EvolutionConfig {
            population_size: 20,
            selection_method: SelectionMethod::Tournament,
            tournament_size: 10,
            ..Default::default()
        };
        assert_eq!(config.min_population_size(), 9);
        assert!(config.validate().is_err());

        let config = EvolutionConfig { tournament_size: 9, ..config };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_creep_must_fit_pacing_bounds() {
        let config = EvolutionConfig { creep_delta: 1001, ..Default::default() };
        assert!(matches!(config.validate(), Err(PursuitError::Configuration(_))));

        let config = EvolutionConfig { creep_step: 5000, ..Default::default() };
        assert!(config.validate().is_err());

        let config = EvolutionConfig {
            pacing_bounds: i32::MIN..=i32::MAX,
            creep_delta: i32::MAX,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = EvolutionConfig { creep_delta: 1000, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_diversity_period() {
        let config = EvolutionConfig { generations: 1000, ..Default::default() };
        assert_eq!(config.diversity_period(), 8);

        let config = EvolutionConfig { generations: 50, ..Default::default() };
        assert_eq!(config.diversity_period(), 0);
    }
}
