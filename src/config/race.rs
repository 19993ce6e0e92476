use super::traits::ConfigSection;
use crate::error::PursuitError;
use serde::{Deserialize, Serialize};

/// Parameters of the bundled reference race model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub segments: usize,
    /// Metres per segment
    pub segment_length: f64,
    pub riders: usize,
    /// Energy budget per rider in kJ
    pub rider_energy: f64,
    /// Power (W) needed to hold 1 m/s cubed at the front.
    pub drag_coefficient: f64,
    /// Fraction of the leader's power spent by riders sitting in the draft.
    pub drafting_factor: f64,
    /// Seconds lost per lead change
    pub transition_time: f64,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            segments: 23,
            segment_length: 125.0,
            riders: 4,
            rider_energy: 90.0,
            drag_coefficient: 0.25,
            drafting_factor: 0.7,
            transition_time: 0.3,
        }
    }
}

impl ConfigSection for RaceConfig {
    fn section_name() -> &'static str {
        "race"
    }

    fn validate(&self) -> Result<(), PursuitError> {
        if self.segments == 0 {
            return Err(PursuitError::Configuration(
                "Race must have at least one segment".to_string()
            ));
        }
        if self.riders < 2 {
            return Err(PursuitError::Configuration(
                "Team needs at least two riders".to_string()
            ));
        }
        if self.segment_length <= 0.0 || self.rider_energy <= 0.0 || self.drag_coefficient <= 0.0 {
            return Err(PursuitError::Configuration(
                "Segment length, rider energy and drag coefficient must be positive".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.drafting_factor) {
            return Err(PursuitError::Configuration(
                "Drafting factor must be between 0 and 1".to_string()
            ));
        }
        if self.transition_time < 0.0 {
            return Err(PursuitError::Configuration(
                "Transition time must not be negative".to_string()
            ));
        }
        Ok(())
    }
}
