use imadet_core::{AnimationConfig, NOISE_FRAME_COUNT};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Most visible grating level in the stimulus set.
pub const VISIBILITY_MAX: i32 = 50;
/// Least visible grating level in the stimulus set.
pub const VISIBILITY_MIN: i32 = 1;

/// Policy constants of the staircase. Fixed for a whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaircaseConfig {
    pub initial_visibility_level: i32,
    pub accuracy_target: u8,
    pub accuracy_upper_bound: u8,
    pub accuracy_lower_bound: u8,
    pub trials_per_cycle: usize,
    pub cycles: usize,
    /// Also clamp the level at `VISIBILITY_MIN`. Off by default, matching the
    /// original study where only the upper end was bounded.
    pub clamp_floor: bool,
}

impl Default for StaircaseConfig {
    fn default() -> Self {
        Self {
            initial_visibility_level: 46,
            accuracy_target: 70,
            accuracy_upper_bound: 75,
            accuracy_lower_bound: 65,
            trials_per_cycle: 10,
            cycles: 12,
            clamp_floor: false,
        }
    }
}

impl StaircaseConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfiguration(msg));

        if self.trials_per_cycle == 0 || self.trials_per_cycle % 2 != 0 {
            return invalid(format!(
                "trials_per_cycle must be a positive even number, got {}",
                self.trials_per_cycle
            ));
        }
        if self.cycles == 0 {
            return invalid("cycles must be at least 1".to_string());
        }
        if !(VISIBILITY_MIN..=VISIBILITY_MAX).contains(&self.initial_visibility_level) {
            return invalid(format!(
                "initial_visibility_level {} outside [{VISIBILITY_MIN}, {VISIBILITY_MAX}]",
                self.initial_visibility_level
            ));
        }
        if self.accuracy_upper_bound > 100 {
            return invalid(format!(
                "accuracy_upper_bound {} exceeds 100",
                self.accuracy_upper_bound
            ));
        }
        if self.accuracy_lower_bound >= self.accuracy_upper_bound {
            return invalid(format!(
                "accuracy_lower_bound {} must be below accuracy_upper_bound {}",
                self.accuracy_lower_bound, self.accuracy_upper_bound
            ));
        }
        if !(self.accuracy_lower_bound..=self.accuracy_upper_bound).contains(&self.accuracy_target)
        {
            return invalid(format!(
                "accuracy_target {} outside [{}, {}]",
                self.accuracy_target, self.accuracy_lower_bound, self.accuracy_upper_bound
            ));
        }
        Ok(())
    }
}

/// Detection practice run before calibration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    /// How often the left / right / noise triple is shown per round.
    pub repetitions: usize,
    /// A round passes when its accuracy is strictly above this.
    pub pass_accuracy: u8,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            repetitions: 2,
            pass_accuracy: 74,
        }
    }
}

impl PracticeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.repetitions == 0 {
            return Err(Error::InvalidConfiguration(
                "practice.repetitions must be at least 1".to_string(),
            ));
        }
        if self.pass_accuracy >= 100 {
            return Err(Error::InvalidConfiguration(format!(
                "practice.pass_accuracy {} leaves no passing accuracy",
                self.pass_accuracy
            )));
        }
        Ok(())
    }
}

/// Block layout of the main imagery experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainExperimentConfig {
    /// How often each of the six conditions is run.
    pub condition_repetitions: usize,
    /// Trials per block, half with a grating.
    pub trials_per_condition: usize,
}

impl Default for MainExperimentConfig {
    fn default() -> Self {
        Self {
            condition_repetitions: 2,
            trials_per_condition: 20,
        }
    }
}

impl MainExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.condition_repetitions == 0 {
            return Err(Error::InvalidConfiguration(
                "main.condition_repetitions must be at least 1".to_string(),
            ));
        }
        if self.trials_per_condition == 0 || self.trials_per_condition % 2 != 0 {
            return Err(Error::InvalidConfiguration(format!(
                "main.trials_per_condition must be a positive even number, got {}",
                self.trials_per_condition
            )));
        }
        Ok(())
    }
}

/// Everything a session needs, as read from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub staircase: StaircaseConfig,
    pub animation: AnimationConfig,
    pub practice: PracticeConfig,
    pub main: MainExperimentConfig,
    /// Seed for the session RNG; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.staircase.validate()?;
        self.practice.validate()?;
        self.main.validate()?;
        // Noise and grating animations must last equally long.
        if self.animation.frames == 0 || self.animation.frames > NOISE_FRAME_COUNT as usize {
            return Err(Error::InvalidConfiguration(format!(
                "animation.frames must be within [1, {NOISE_FRAME_COUNT}], got {}",
                self.animation.frames
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        StaircaseConfig::default().validate().unwrap();
        SessionConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_odd_or_empty_cycles() {
        for trials in [0, 7, 11] {
            let config = StaircaseConfig {
                trials_per_cycle: trials,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(Error::InvalidConfiguration(_))
            ));
        }
        let config = StaircaseConfig {
            cycles: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_or_equal_bounds() {
        let config = StaircaseConfig {
            accuracy_lower_bound: 75,
            accuracy_upper_bound: 75,
            accuracy_target: 75,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = StaircaseConfig {
            accuracy_lower_bound: 80,
            accuracy_upper_bound: 60,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_target_outside_band() {
        let config = StaircaseConfig {
            accuracy_target: 80,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = StaircaseConfig {
            accuracy_target: 60,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn target_on_band_edge_is_allowed() {
        let config = StaircaseConfig {
            accuracy_target: 75,
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn rejects_initial_level_out_of_range() {
        for level in [0, 51, -3] {
            let config = StaircaseConfig {
                initial_visibility_level: level,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            SessionConfig::from_json_str(r#"{ "staircase": { "cycles": 4 }, "seed": 11 }"#)
                .unwrap();
        assert_eq!(config.staircase.cycles, 4);
        assert_eq!(config.staircase.trials_per_cycle, 10);
        assert_eq!(config.animation, AnimationConfig::default());
        assert_eq!(config.seed, Some(11));
    }

    #[test]
    fn invalid_json_config_fails_fast() {
        let err = SessionConfig::from_json_str(r#"{ "staircase": { "trials_per_cycle": 9 } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        let err = SessionConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn frame_count_limited_to_noise_frames() {
        let err = SessionConfig::from_json_str(r#"{ "animation": { "frames": 30 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        let err = SessionConfig::from_json_str(r#"{ "animation": { "frames": 0 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        let config = SessionConfig::from_json_str(r#"{ "animation": { "frames": 20 } }"#).unwrap();
        assert_eq!(config.animation.frames, 20);
    }

    #[test]
    fn practice_and_main_sections() {
        let config = SessionConfig::from_json_str(
            r#"{ "practice": { "repetitions": 3 }, "main": { "trials_per_condition": 8 } }"#,
        )
        .unwrap();
        assert_eq!(config.practice.repetitions, 3);
        assert_eq!(config.practice.pass_accuracy, 74);
        assert_eq!(config.main.trials_per_condition, 8);
        assert_eq!(config.main.condition_repetitions, 2);

        for json in [
            r#"{ "practice": { "repetitions": 0 } }"#,
            r#"{ "practice": { "pass_accuracy": 100 } }"#,
            r#"{ "main": { "trials_per_condition": 7 } }"#,
            r#"{ "main": { "condition_repetitions": 0 } }"#,
        ] {
            assert!(matches!(
                SessionConfig::from_json_str(json),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SessionConfig::load("/nonexistent/imadet/session.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
