use imadet_core::{
    ImageSequenceType, Orientation, ResponseKey, ResponseMapping, TrialOutcome,
    generate_image_sequence,
};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::SessionConfig;
use super::controller::{CycleDecision, CycleReport, StaircaseController};
use super::error::{Error, Result};

/// Calibrated grating visibility of one participant, per orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantVisibility {
    pub left: i32,
    pub right: i32,
}

impl ParticipantVisibility {
    pub fn level(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::LeftTilted => self.left,
            Orientation::RightTilted => self.right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleLogEntry {
    pub orientation: Orientation,
    #[serde(flatten)]
    pub report: CycleReport,
}

/// Both calibration tracks of a session, run one after the other.
///
/// The key mapping and the track order are drawn from `rng` at
/// construction; cycle plans and noise frames draw from it later on.
pub struct CalibrationSession<R: Rng> {
    config: SessionConfig,
    rng: R,
    mapping: ResponseMapping,
    order: [Orientation; 2],
    track_index: usize,
    controller: StaircaseController,
    left: Option<i32>,
    right: Option<i32>,
    log: Vec<CycleLogEntry>,
}

impl<R: Rng> CalibrationSession<R> {
    pub fn new(config: SessionConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let mapping = ResponseMapping::random(&mut rng);
        let mut order = Orientation::BOTH;
        order.shuffle(&mut rng);
        info!(
            prompt = %mapping.prompt(),
            first = ?order[0],
            "calibration session started"
        );

        let controller = StaircaseController::new(config.staircase.clone())?;
        Ok(Self {
            config,
            rng,
            mapping,
            order,
            track_index: 0,
            controller,
            left: None,
            right: None,
            log: Vec::new(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Display time of each animation frame.
    pub fn frame_time_ms(&self) -> u64 {
        self.config.animation.frame_time_ms()
    }

    pub fn response_mapping(&self) -> ResponseMapping {
        self.mapping
    }

    pub fn track_order(&self) -> [Orientation; 2] {
        self.order
    }

    /// Orientation being calibrated, `None` once both are done.
    pub fn current_orientation(&self) -> Option<Orientation> {
        self.order.get(self.track_index).copied()
    }

    pub fn controller(&self) -> &StaircaseController {
        &self.controller
    }

    pub fn is_complete(&self) -> bool {
        self.track_index >= self.order.len()
    }

    /// Presence flags for the next cycle: half present, shuffled.
    pub fn cycle_plan(&mut self) -> Vec<bool> {
        let n = self.config.staircase.trials_per_cycle;
        let mut plan: Vec<bool> = (0..n).map(|i| i < n / 2).collect();
        plan.shuffle(&mut self.rng);
        plan
    }

    /// Frames to animate for a trial of the current track.
    pub fn stimulus_frames(&mut self, stimulus_present: bool) -> Result<Vec<String>> {
        let orientation = self.current_orientation().ok_or(Error::RunFinished)?;
        let kind = ImageSequenceType::for_trial(orientation, stimulus_present);
        let end_level = if kind.is_noise() {
            1
        } else {
            self.controller.visibility_level()
        };
        Ok(generate_image_sequence(
            &mut self.rng,
            1,
            end_level,
            self.config.animation.frames,
            kind,
        ))
    }

    pub fn record_key(&mut self, stimulus_present: bool, key: ResponseKey) -> Result<TrialOutcome> {
        if self.is_complete() {
            return Err(Error::RunFinished);
        }
        let response = self.mapping.interpret(key);
        self.controller.record(stimulus_present, response)
    }

    pub fn evaluate(&mut self) -> Result<CycleDecision> {
        let orientation = self.current_orientation().ok_or(Error::RunFinished)?;
        let decision = self.controller.evaluate()?;
        self.log.push(CycleLogEntry {
            orientation,
            report: *decision.report(),
        });

        if let CycleDecision::Finished { final_level, .. } = decision {
            match orientation {
                Orientation::LeftTilted => self.left = Some(final_level),
                Orientation::RightTilted => self.right = Some(final_level),
            }
            self.controller.restart()?;
            self.track_index += 1;
            info!(?orientation, final_level, "track calibrated");
        }
        Ok(decision)
    }

    /// Every cycle evaluated so far, both tracks.
    pub fn cycle_log(&self) -> &[CycleLogEntry] {
        &self.log
    }

    pub fn finish(&self) -> Result<ParticipantVisibility> {
        match (self.left, self.right) {
            (Some(left), Some(right)) => Ok(ParticipantVisibility { left, right }),
            _ => Err(Error::SessionIncomplete),
        }
    }
}
