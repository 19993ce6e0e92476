use crate::error::Result;
use crate::types::RaceOutcome;

/// A race simulator the EA scores genomes against.
///
/// Implementations must be deterministic for a fixed configuration: the same
/// pacing and transition arrays always yield the same outcome. A race that
/// does not finish is reported through `RaceOutcome::completed`, while `Err`
/// is reserved for a simulator that cannot run at all.
pub trait RaceSimulator {
    /// Number of race segments, fixing the genome length for a run.
    fn segment_count(&self) -> usize;

    fn simulate(&self, pacing: &[i32], transitions: &[bool]) -> Result<RaceOutcome>;
}

impl<S: RaceSimulator + ?Sized> RaceSimulator for &S {
    fn segment_count(&self) -> usize {
        (**self).segment_count()
    }

    fn simulate(&self, pacing: &[i32], transitions: &[bool]) -> Result<RaceOutcome> {
        (**self).simulate(pacing, transitions)
    }
}
