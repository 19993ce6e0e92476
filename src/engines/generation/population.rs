use crate::engines::generation::genome::Genome;
use crate::error::{PursuitError, Result};
use crate::types::GenerationStats;

/// Evaluated genomes competing in a run.
///
/// Only scored genomes are admitted, so every member's fitness is readable.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Genome>,
}

fn score(genome: &Genome) -> f64 {
    genome.fitness().unwrap_or(f64::INFINITY)
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, genome: Genome) -> Result<()> {
        if !genome.is_evaluated() {
            return Err(PursuitError::Precondition(
                "cannot admit an unevaluated genome".to_string(),
            ));
        }
        self.members.push(genome);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Genome] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Genome> {
        self.members.iter()
    }

    /// Lowest fitness; ties go to the earliest member.
    pub fn best(&self) -> Option<&Genome> {
        let mut best: Option<&Genome> = None;
        for genome in &self.members {
            if best.map_or(true, |b| score(genome) < score(b)) {
                best = Some(genome);
            }
        }
        best
    }

    /// Highest fitness; ties go to the earliest member.
    pub fn worst_index(&self) -> Option<usize> {
        let mut worst: Option<usize> = None;
        for (i, genome) in self.members.iter().enumerate() {
            if worst.map_or(true, |w| score(genome) > score(&self.members[w])) {
                worst = Some(i);
            }
        }
        worst
    }

    pub fn worst(&self) -> Option<&Genome> {
        self.worst_index().map(|i| &self.members[i])
    }

    /// Steady-state replacement: the child takes the worst member's slot only
    /// if its fitness is strictly lower. Returns whether it was admitted.
    pub fn replace_worst_if_better(&mut self, child: Genome) -> Result<bool> {
        if !child.is_evaluated() {
            return Err(PursuitError::Precondition(
                "cannot admit an unevaluated genome".to_string(),
            ));
        }
        let idx = self.worst_index().ok_or_else(|| {
            PursuitError::Precondition("replacement on an empty population".to_string())
        })?;
        if score(&child) < score(&self.members[idx]) {
            self.members[idx] = child;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn remove_worst(&mut self) -> Option<Genome> {
        self.worst_index().map(|i| self.members.swap_remove(i))
    }

    pub fn stats(&self, generation: usize) -> Option<GenerationStats> {
        let best = self.best()?;
        let worst = self.worst()?;
        Some(GenerationStats {
            generation,
            best_fitness: score(best),
            best_energy_remaining: best.energy_remaining().unwrap_or(0.0),
            worst_fitness: score(worst),
            worst_energy_remaining: worst.energy_remaining().unwrap_or(0.0),
            population_size: self.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(fitness: f64) -> Genome {
        Genome::scored(vec![300; 4], vec![false; 4], fitness)
    }

    fn population(fitnesses: &[f64]) -> Population {
        let mut population = Population::new();
        for &f in fitnesses {
            population.push(scored(f)).unwrap();
        }
        population
    }

    #[test]
    fn test_best_and_worst() {
        let population = population(&[250.0, 240.0, 1000.0, 245.0]);
        assert_eq!(population.best().unwrap().fitness(), Some(240.0));
        assert_eq!(population.worst().unwrap().fitness(), Some(1000.0));
        assert_eq!(population.worst_index(), Some(2));
    }

    #[test]
    fn test_rejects_unevaluated() {
        let mut population = Population::new();
        let genome = Genome::from_strategies(vec![300; 4], vec![false; 4]).unwrap();
        assert!(matches!(population.push(genome), Err(PursuitError::Precondition(_))));
    }

    #[test]
    fn test_replace_worst_only_when_strictly_better() {
        let mut population = population(&[250.0, 260.0]);

        assert!(!population.replace_worst_if_better(scored(260.0)).unwrap());
        assert!(!population.replace_worst_if_better(scored(270.0)).unwrap());
        assert!(population.replace_worst_if_better(scored(255.0)).unwrap());

        let mut fitnesses: Vec<f64> = population.iter().filter_map(|g| g.fitness()).collect();
        fitnesses.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(fitnesses, vec![250.0, 255.0]);
    }

    #[test]
    fn test_replace_on_empty_population_fails() {
        let mut population = Population::new();
        assert!(population.replace_worst_if_better(scored(1.0)).is_err());
    }

    #[test]
    fn test_remove_worst() {
        let mut population = population(&[250.0, 900.0, 240.0]);
        let removed = population.remove_worst().unwrap();
        assert_eq!(removed.fitness(), Some(900.0));
        assert_eq!(population.len(), 2);
        assert_eq!(population.worst().unwrap().fitness(), Some(250.0));
    }

    #[test]
    fn test_stats() {
        let population = population(&[250.0, 240.0]);
        let stats = population.stats(7).unwrap();
        assert_eq!(stats.generation, 7);
        assert_eq!(stats.best_fitness, 240.0);
        assert_eq!(stats.worst_fitness, 250.0);
        assert_eq!(stats.population_size, 2);
        assert!(Population::new().stats(0).is_none());
    }
}
