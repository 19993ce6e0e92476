use crate::engines::evaluation::{FitnessEvaluator, RaceSimulator};
use crate::error::{PursuitError, Result};
use crate::types::Evaluation;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A candidate race plan: one pacing value and one lead-change flag per
/// segment, plus the score it earned in the simulator.
///
/// Both arrays always have the same length, fixed when the genome is built.
/// Writable access goes through [`Genome::pacing_mut`] and
/// [`Genome::transitions_mut`], which hand out slices (so the length cannot
/// change) and drop any previous evaluation (so a score never outlives the
/// plan it was computed for).
///
/// Children are produced with `Clone`, which deep-copies both arrays; a
/// parent is never written to while breeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GenomeRecord")]
pub struct Genome {
    pacing_strategy: Vec<i32>,
    transition_strategy: Vec<bool>,
    evaluation: Option<Evaluation>,
}

/// Wire form of a genome, checked through [`Genome::from_strategies`].
#[derive(Deserialize)]
struct GenomeRecord {
    pacing_strategy: Vec<i32>,
    transition_strategy: Vec<bool>,
    #[serde(default)]
    evaluation: Option<Evaluation>,
}

impl TryFrom<GenomeRecord> for Genome {
    type Error = PursuitError;

    fn try_from(record: GenomeRecord) -> Result<Self> {
        let mut genome =
            Genome::from_strategies(record.pacing_strategy, record.transition_strategy)?;
        genome.evaluation = record.evaluation;
        Ok(genome)
    }
}

impl Genome {
    /// Random plan of `segments` entries, pacing drawn from `pacing_range`.
    pub fn random<R: Rng>(segments: usize, pacing_range: &Range<i32>, rng: &mut R) -> Self {
        let mut genome = Self {
            pacing_strategy: vec![pacing_range.start; segments],
            transition_strategy: vec![false; segments],
            evaluation: None,
        };
        genome.initialise(pacing_range, rng);
        genome
    }

    pub fn from_strategies(pacing: Vec<i32>, transitions: Vec<bool>) -> Result<Self> {
        if pacing.len() != transitions.len() {
            return Err(PursuitError::Precondition(format!(
                "pacing has {} segments but transitions has {}",
                pacing.len(),
                transitions.len()
            )));
        }
        Ok(Self {
            pacing_strategy: pacing,
            transition_strategy: transitions,
            evaluation: None,
        })
    }

    /// Refill both arrays with uniform random values and forget the old score.
    pub fn initialise<R: Rng>(&mut self, pacing_range: &Range<i32>, rng: &mut R) {
        for value in self.pacing_strategy.iter_mut() {
            *value = rng.gen_range(pacing_range.clone());
        }
        for flag in self.transition_strategy.iter_mut() {
            *flag = rng.gen_bool(0.5);
        }
        self.evaluation = None;
    }

    /// Score this plan; see [`FitnessEvaluator::evaluate`].
    pub fn evaluate<S: RaceSimulator>(
        &mut self,
        evaluator: &FitnessEvaluator,
        simulator: &S,
    ) -> Result<()> {
        let evaluation = evaluator.evaluate(self, simulator)?;
        self.evaluation = Some(evaluation);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pacing_strategy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pacing_strategy.is_empty()
    }

    pub fn pacing(&self) -> &[i32] {
        &self.pacing_strategy
    }

    pub fn transitions(&self) -> &[bool] {
        &self.transition_strategy
    }

    pub fn pacing_mut(&mut self) -> &mut [i32] {
        self.evaluation = None;
        &mut self.pacing_strategy
    }

    pub fn transitions_mut(&mut self) -> &mut [bool] {
        self.evaluation = None;
        &mut self.transition_strategy
    }

    /// Both arrays at once, for operators that edit them together.
    pub fn strategies_mut(&mut self) -> (&mut [i32], &mut [bool]) {
        self.evaluation = None;
        (&mut self.pacing_strategy, &mut self.transition_strategy)
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluation.is_some()
    }

    /// Lower is better. `None` until evaluated.
    pub fn fitness(&self) -> Option<f64> {
        self.evaluation.map(|e| e.fitness)
    }

    pub fn energy_remaining(&self) -> Option<f64> {
        self.evaluation.map(|e| e.energy_remaining)
    }

    #[cfg(test)]
    pub(crate) fn scored(pacing: Vec<i32>, transitions: Vec<bool>, fitness: f64) -> Self {
        Self {
            pacing_strategy: pacing,
            transition_strategy: transitions,
            evaluation: Some(Evaluation {
                fitness,
                energy_remaining: 0.0,
                completed: true,
            }),
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.evaluation {
            Some(e) => write!(
                f,
                "fitness {:.4} energy {:.2}{}",
                e.fitness,
                e.energy_remaining,
                if e.completed { "" } else { " (did not finish)" }
            )?,
            None => write!(f, "unevaluated")?,
        }
        write!(f, "\npacing: {:?}\ntransitions: [", self.pacing_strategy)?;
        for (i, flag) in self.transition_strategy.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", if *flag { 1 } else { 0 })?;
        }
        write!(f, "]")
    }
}
