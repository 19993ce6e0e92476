use super::simulator::RaceSimulator;
use crate::config::RaceConfig;
use crate::error::{PursuitError, Result};
use crate::types::RaceOutcome;

/// Small deterministic team-pursuit model used by the binary and tests.
///
/// The leader rides each segment at the planned power and sets the speed
/// `v = (P / drag)^(1/3)`; the riders behind spend `drafting_factor * P`.
/// A `true` transition flag sends the leader to the back after that segment
/// and costs `transition_time` seconds. The race fails as soon as any rider's
/// energy budget runs out.
pub struct ReferenceRace {
    config: RaceConfig,
}

impl ReferenceRace {
    pub fn new(config: RaceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }
}

impl RaceSimulator for ReferenceRace {
    fn segment_count(&self) -> usize {
        self.config.segments
    }

    fn simulate(&self, pacing: &[i32], transitions: &[bool]) -> Result<RaceOutcome> {
        let c = &self.config;
        if pacing.len() != c.segments || transitions.len() != c.segments {
            return Err(PursuitError::Simulator(format!(
                "expected {} segments, got pacing {} and transitions {}",
                c.segments,
                pacing.len(),
                transitions.len()
            )));
        }

        // joules left per rider
        let mut energy = vec![c.rider_energy * 1000.0; c.riders];
        let mut leader = 0;
        let mut time = 0.0;

        for (&power, &swap) in pacing.iter().zip(transitions) {
            if power <= 0 {
                return Err(PursuitError::Simulator(format!(
                    "pacing power must be positive, got {}",
                    power
                )));
            }
            let power = f64::from(power);
            let speed = (power / c.drag_coefficient).cbrt();
            let duration = c.segment_length / speed;
            time += duration;

            for (rider, budget) in energy.iter_mut().enumerate() {
                let share = if rider == leader { 1.0 } else { c.drafting_factor };
                *budget -= share * power * duration;
            }

            if energy.iter().any(|e| *e < 0.0) {
                return Ok(RaceOutcome {
                    completed: false,
                    time,
                    energy_remaining: remaining_kj(&energy),
                });
            }

            if swap {
                leader = (leader + 1) % c.riders;
                time += c.transition_time;
            }
        }

        Ok(RaceOutcome {
            completed: true,
            time,
            energy_remaining: remaining_kj(&energy),
        })
    }
}

fn remaining_kj(energy: &[f64]) -> f64 {
    energy.iter().map(|e| e.max(0.0)).sum::<f64>() / 1000.0
}
