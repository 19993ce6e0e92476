use crate::config::SelectionMethod;
use crate::engines::generation::genome::Genome;
use crate::engines::generation::population::Population;
use crate::error::{PursuitError, Result};
use rand::Rng;

fn require_members(population: &Population) -> Result<()> {
    if population.is_empty() {
        return Err(PursuitError::Precondition(
            "cannot select from an empty population".to_string(),
        ));
    }
    Ok(())
}

fn fitness_of(genome: &Genome) -> f64 {
    genome.fitness().unwrap_or(f64::INFINITY)
}

/// Pick a parent with the configured strategy. Always returns a copy.
pub fn select<R: Rng>(
    method: SelectionMethod,
    population: &Population,
    tournament_size: usize,
    rng: &mut R,
) -> Result<Genome> {
    match method {
        SelectionMethod::Roulette => roulette_selection(population, rng),
        SelectionMethod::Tournament => tournament_selection(population, tournament_size, rng),
    }
}

/// Tournament selection: best (lowest fitness) of K draws with replacement
pub fn tournament_selection<R: Rng>(
    population: &Population,
    tournament_size: usize,
    rng: &mut R,
) -> Result<Genome> {
    require_members(population)?;
    if tournament_size == 0 || tournament_size > population.len() {
        return Err(PursuitError::Precondition(format!(
            "tournament size {} invalid for population of {}",
            tournament_size,
            population.len()
        )));
    }

    let members = population.members();
    let mut best_idx = rng.gen_range(0..members.len());
    let mut best_fitness = fitness_of(&members[best_idx]);

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..members.len());
        if fitness_of(&members[idx]) < best_fitness {
            best_idx = idx;
            best_fitness = fitness_of(&members[idx]);
        }
    }

    Ok(members[best_idx].clone())
}

/// Roulette wheel selection biased toward low fitness.
///
/// Each member's slice is `1 / (1 + f - f_best)`: the incumbent gets weight 1,
/// and the weight falls off with the gap to it. This stays positive when an
/// energy bonus pushes fitness below zero, and an all-equal population
/// degrades to a uniform draw.
pub fn roulette_selection<R: Rng>(population: &Population, rng: &mut R) -> Result<Genome> {
    require_members(population)?;
    let members = population.members();

    let best = members
        .iter()
        .map(fitness_of)
        .fold(f64::INFINITY, f64::min);
    let weights: Vec<f64> = members
        .iter()
        .map(|g| 1.0 / (1.0 + fitness_of(g) - best))
        .collect();
    let total: f64 = weights.iter().sum();

    let spin = rng.gen::<f64>() * total;
    let mut running = 0.0;
    for (genome, weight) in members.iter().zip(&weights) {
        running += weight;
        if running > spin {
            return Ok(genome.clone());
        }
    }

    // Rounding can leave the spin just past the final running total
    Ok(members[members.len() - 1].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population(fitnesses: &[f64]) -> Population {
        let mut population = Population::new();
        for (i, &f) in fitnesses.iter().enumerate() {
            population
                .push(Genome::scored(vec![i as i32; 3], vec![false; 3], f))
                .unwrap();
        }
        population
    }

    #[test]
    fn test_roulette_prefers_lower_fitness() {
        let population = population(&[240.0, 1000.0]);
        let mut rng = StdRng::seed_from_u64(42);

        let mut picked_best = 0;
        for _ in 0..1000 {
            let parent = roulette_selection(&population, &mut rng).unwrap();
            if parent.fitness() == Some(240.0) {
                picked_best += 1;
            }
        }
        // weights 1 and 1/761
        assert!(picked_best > 950, "picked best {} times", picked_best);
    }

    #[test]
    fn test_roulette_handles_negative_fitness() {
        let population = population(&[-5.0, -2.0, 3.0]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(roulette_selection(&population, &mut rng).is_ok());
        }
    }

    #[test]
    fn test_tournament_of_whole_population_tends_to_best() {
        let population = population(&[250.0, 245.0, 260.0, 1000.0]);
        let mut rng = StdRng::seed_from_u64(9);
        let mut total = 0.0;
        for _ in 0..200 {
            total += tournament_selection(&population, 4, &mut rng)
                .unwrap()
                .fitness()
                .unwrap();
        }
        let average = total / 200.0;
        assert!(average < 260.0, "average fitness {}", average);
    }

    #[test]
    fn test_tournament_size_one_is_uniform_pick() {
        let population = population(&[250.0, 245.0]);
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen_worse = false;
        for _ in 0..100 {
            if tournament_selection(&population, 1, &mut rng).unwrap().fitness() == Some(250.0) {
                seen_worse = true;
            }
        }
        assert!(seen_worse);
    }

    #[test]
    fn test_selection_is_reproducible() {
        let population = population(&[250.0, 245.0, 260.0, 300.0, 241.0]);
        for method in [SelectionMethod::Roulette, SelectionMethod::Tournament] {
            let mut a = StdRng::seed_from_u64(77);
            let mut b = StdRng::seed_from_u64(77);
            for _ in 0..20 {
                let x = select(method, &population, 3, &mut a).unwrap();
                let y = select(method, &population, 3, &mut b).unwrap();
                assert_eq!(x, y);
            }
        }
    }

    #[test]
    fn test_empty_population_is_precondition_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty = Population::new();
        assert!(matches!(
            roulette_selection(&empty, &mut rng),
            Err(PursuitError::Precondition(_))
        ));
        assert!(matches!(
            tournament_selection(&empty, 1, &mut rng),
            Err(PursuitError::Precondition(_))
        ));
    }

    #[test]
    fn test_oversized_tournament_is_precondition_error() {
        let population = population(&[250.0, 245.0]);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            tournament_selection(&population, 3, &mut rng),
            Err(PursuitError::Precondition(_))
        ));
    }
}
