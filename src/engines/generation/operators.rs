use crate::config::{CrossoverMethod, EvolutionConfig, MutationOperator};
use crate::engines::generation::genome::Genome;
use crate::error::{PursuitError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::{Range, RangeInclusive};

fn check_lengths(parent1: &Genome, parent2: &Genome) -> Result<()> {
    if parent1.len() != parent2.len() {
        return Err(PursuitError::Precondition(format!(
            "parents differ in length: {} vs {}",
            parent1.len(),
            parent2.len()
        )));
    }
    Ok(())
}

/// Random cut pair `c1 <= c2`, both in `[0, len)`.
fn cut_points<R: Rng>(len: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.gen_range(0..len);
    let b = rng.gen_range(0..len);
    (a.min(b), a.max(b))
}

fn splice<T: Copy>(child: &mut [T], donor: &[T], range: Range<usize>) {
    child[range.clone()].copy_from_slice(&donor[range]);
}

/// Gated crossover. On a miss the children are plain copies of the parents.
pub fn crossover<R: Rng>(
    method: CrossoverMethod,
    probability: f64,
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut R,
) -> Result<(Genome, Genome)> {
    check_lengths(parent1, parent2)?;
    if rng.gen::<f64>() >= probability {
        return Ok((parent1.clone(), parent2.clone()));
    }
    match method {
        CrossoverMethod::Uniform => uniform_crossover(parent1, parent2, rng),
        CrossoverMethod::OnePoint => one_point_crossover(parent1, parent2, rng),
        CrossoverMethod::TwoPoint => two_point_crossover(parent1, parent2, rng),
    }
}

/// Uniform crossover: a fair coin per position decides which parent each
/// child inherits from; the second child takes the other side of every coin.
pub fn uniform_crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut R,
) -> Result<(Genome, Genome)> {
    check_lengths(parent1, parent2)?;
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    {
        let (pacing1, transitions1) = child1.strategies_mut();
        let (pacing2, transitions2) = child2.strategies_mut();

        for i in 0..pacing1.len() {
            if rng.gen_bool(0.5) {
                std::mem::swap(&mut pacing1[i], &mut pacing2[i]);
            }
        }
        for i in 0..transitions1.len() {
            if rng.gen_bool(0.5) {
                std::mem::swap(&mut transitions1[i], &mut transitions2[i]);
            }
        }
    }

    Ok((child1, child2))
}

/// Single-point crossover: prefix from one parent, suffix from the other,
/// with an independent cut for each array.
pub fn one_point_crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut R,
) -> Result<(Genome, Genome)> {
    check_lengths(parent1, parent2)?;
    let len = parent1.len();
    if len == 0 {
        return Ok((parent1.clone(), parent2.clone()));
    }
    let pacing_point = rng.gen_range(0..len);
    let transition_point = rng.gen_range(0..len);
    two_point_crossover_at(
        parent1,
        parent2,
        (pacing_point, len),
        (transition_point, len),
    )
}

/// Two-point crossover with independent cuts for each array.
pub fn two_point_crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut R,
) -> Result<(Genome, Genome)> {
    check_lengths(parent1, parent2)?;
    let len = parent1.len();
    if len == 0 {
        return Ok((parent1.clone(), parent2.clone()));
    }
    let pacing_cuts = cut_points(len, rng);
    let transition_cuts = cut_points(len, rng);
    two_point_crossover_at(parent1, parent2, pacing_cuts, transition_cuts)
}

/// Two-point crossover at fixed cuts. Child 1 is parent 1 with parent 2's
/// `[c1, c2)` segment; child 2 is the complement. Cuts may come in either
/// order and are clamped to the genome length.
pub fn two_point_crossover_at(
    parent1: &Genome,
    parent2: &Genome,
    pacing_cuts: (usize, usize),
    transition_cuts: (usize, usize),
) -> Result<(Genome, Genome)> {
    check_lengths(parent1, parent2)?;
    let len = parent1.len();
    let segment = |(a, b): (usize, usize)| a.min(b).min(len)..a.max(b).min(len);
    let pacing_range = segment(pacing_cuts);
    let transition_range = segment(transition_cuts);

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    splice(child1.pacing_mut(), parent2.pacing(), pacing_range.clone());
    splice(child2.pacing_mut(), parent1.pacing(), pacing_range);
    splice(child1.transitions_mut(), parent2.transitions(), transition_range.clone());
    splice(child2.transitions_mut(), parent1.transitions(), transition_range);

    Ok((child1, child2))
}

impl MutationOperator {
    /// Apply this operator unconditionally.
    pub fn apply<R: Rng>(&self, genome: &mut Genome, config: &EvolutionConfig, rng: &mut R) {
        match self {
            MutationOperator::Point => point_mutation(
                genome,
                config.mutation_rate_max,
                &config.init_pacing_range,
                rng,
            ),
            MutationOperator::Scramble => scramble_mutation(genome, rng),
            MutationOperator::Creep => creep_mutation(
                genome,
                &config.pacing_bounds,
                config.creep_delta,
                config.creep_step,
                rng,
            ),
        }
    }
}

/// Run the configured pipeline in order, each step firing with
/// `mutation_probability`. Returns how many steps fired.
pub fn mutate<R: Rng>(genome: &mut Genome, config: &EvolutionConfig, rng: &mut R) -> usize {
    let mut applied = 0;
    for operator in &config.mutation_pipeline {
        if rng.gen::<f64>() < config.mutation_probability {
            operator.apply(genome, config, rng);
            applied += 1;
        }
    }
    applied
}

/// Flip `k` random transition flags and redraw `k` random pacing values,
/// where `k` is drawn from `1..=max_rate`.
pub fn point_mutation<R: Rng>(
    genome: &mut Genome,
    max_rate: usize,
    pacing_range: &Range<i32>,
    rng: &mut R,
) {
    if genome.is_empty() {
        return;
    }
    let rate = 1 + rng.gen_range(0..max_rate.max(1));
    let (pacing, transitions) = genome.strategies_mut();

    for _ in 0..rate {
        let idx = rng.gen_range(0..transitions.len());
        transitions[idx] = !transitions[idx];
    }
    for _ in 0..rate {
        let idx = rng.gen_range(0..pacing.len());
        pacing[idx] = rng.gen_range(pacing_range.clone());
    }
}

/// Nudge every pacing value by a random amount in `[-delta, delta]`.
pub fn creep_mutation<R: Rng>(
    genome: &mut Genome,
    bounds: &RangeInclusive<i32>,
    delta: i32,
    step: i32,
    rng: &mut R,
) {
    for value in genome.pacing_mut() {
        let nudge = rng.gen_range(-delta..=delta);
        *value = creep_value(*value, nudge, bounds, step);
    }
}

/// One creep step: add `nudge`, then pull back by a single `step` if the
/// result left `bounds`. Values are not clamped, so a result may still sit
/// slightly outside the bounds. Arithmetic saturates at the `i32` limits.
pub fn creep_value(value: i32, nudge: i32, bounds: &RangeInclusive<i32>, step: i32) -> i32 {
    let moved = value.saturating_add(nudge);
    if moved > *bounds.end() {
        moved.saturating_sub(step)
    } else if moved < *bounds.start() {
        moved.saturating_add(step)
    } else {
        moved
    }
}

/// Shuffle a random sub-range of each array independently.
pub fn scramble_mutation<R: Rng>(genome: &mut Genome, rng: &mut R) {
    if genome.is_empty() {
        return;
    }
    let len = genome.len();
    let (pacing, transitions) = genome.strategies_mut();

    let (a, b) = (rng.gen_range(0..len), rng.gen_range(0..len));
    scramble_range(pacing, a, b, rng);

    let (a, b) = (rng.gen_range(0..len), rng.gen_range(0..len));
    scramble_range(transitions, a, b, rng);
}

/// Permute `values[min(a,b)..max(a,b)]` in place.
pub fn scramble_range<T, R: Rng>(values: &mut [T], a: usize, b: usize, rng: &mut R) {
    let lo = a.min(b).min(values.len());
    let hi = a.max(b).min(values.len());
    values[lo..hi].shuffle(rng);
}
