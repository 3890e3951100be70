use imadet_core::{Response, TrialOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::{StaircaseConfig, VISIBILITY_MAX, VISIBILITY_MIN};
use super::error::{Error, Result};
use super::recorder::{BalancedCycle, TrialRecorder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaircaseState {
    RunningCycle,
    Evaluating,
    Done,
}

/// Calibration state of one orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationTrack {
    visibility_level: i32,
    cycles_completed: usize,
    final_visibility_level: Option<i32>,
}

impl CalibrationTrack {
    pub fn new(initial_level: i32) -> Self {
        Self {
            visibility_level: initial_level,
            cycles_completed: 0,
            final_visibility_level: None,
        }
    }

    pub fn visibility_level(&self) -> i32 {
        self.visibility_level
    }

    pub fn cycles_completed(&self) -> usize {
        self.cycles_completed
    }

    pub fn final_visibility_level(&self) -> Option<i32> {
        self.final_visibility_level
    }

    fn finish(&mut self, initial_level: i32) -> i32 {
        debug_assert!(self.final_visibility_level.is_none());
        let final_level = self.visibility_level;
        self.final_visibility_level = Some(final_level);
        self.cycles_completed = 0;
        self.visibility_level = initial_level;
        final_level
    }
}

/// What one evaluated cycle produced.
///
/// `visibility_level` is the level the adjustment rule arrived at. On the
/// last cycle of a run it is reported but never applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: usize,
    pub accuracy: u8,
    pub previous_level: i32,
    pub visibility_level: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDecision {
    Continue(CycleReport),
    Finished { report: CycleReport, final_level: i32 },
}

impl CycleDecision {
    pub fn report(&self) -> &CycleReport {
        match self {
            CycleDecision::Continue(report) => report,
            CycleDecision::Finished { report, .. } => report,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, CycleDecision::Finished { .. })
    }
}

/// Drives one track through `cycles` accuracy estimates.
///
/// The runner calls [`record`](Self::record) once per answered trial. When
/// the cycle is full the controller moves to `Evaluating` and refuses more
/// trials until [`evaluate`](Self::evaluate) has run.
#[derive(Debug, Clone)]
pub struct StaircaseController {
    config: StaircaseConfig,
    track: CalibrationTrack,
    recorder: TrialRecorder,
    state: StaircaseState,
    cycle: BalancedCycle,
    history: Vec<CycleReport>,
}

impl StaircaseController {
    /// Fails with `InvalidConfiguration` before any trial can be recorded.
    pub fn new(config: StaircaseConfig) -> Result<Self> {
        config.validate()?;
        let track = CalibrationTrack::new(config.initial_visibility_level);
        let cycle = BalancedCycle::new(config.trials_per_cycle);
        Ok(Self {
            config,
            track,
            recorder: TrialRecorder::new(),
            state: StaircaseState::RunningCycle,
            cycle,
            history: Vec::new(),
        })
    }

    pub fn record(&mut self, stimulus_present: bool, response: Response) -> Result<TrialOutcome> {
        match self.state {
            StaircaseState::Done => return Err(Error::RunFinished),
            StaircaseState::Evaluating => {
                return Err(Error::CycleFull {
                    required: self.config.trials_per_cycle,
                });
            }
            StaircaseState::RunningCycle => {}
        }

        self.cycle.admit(stimulus_present)?;
        let outcome = self.recorder.record(stimulus_present, response);
        debug!(
            trial = self.cycle.recorded(),
            stimulus_present,
            correct = outcome.correct(),
            "trial recorded"
        );

        if self.cycle.is_full() {
            self.state = StaircaseState::Evaluating;
        }
        Ok(outcome)
    }

    pub fn evaluate(&mut self) -> Result<CycleDecision> {
        match self.state {
            StaircaseState::Done => return Err(Error::RunFinished),
            StaircaseState::RunningCycle | StaircaseState::Evaluating => {
                self.cycle.ensure_full()?;
            }
        }

        let accuracy = accuracy(self.recorder.tail(self.config.trials_per_cycle))?;
        let previous_level = self.track.visibility_level;
        let visibility_level = adjust_level(&self.config, previous_level, accuracy);

        self.track.cycles_completed += 1;
        self.cycle.reset();

        let report = CycleReport {
            cycle: self.track.cycles_completed,
            accuracy,
            previous_level,
            visibility_level,
        };
        self.history.push(report);
        info!(
            cycle = report.cycle,
            accuracy,
            previous_level,
            visibility_level,
            "cycle evaluated"
        );

        if self.track.cycles_completed >= self.config.cycles {
            let final_level = self.track.finish(self.config.initial_visibility_level);
            self.state = StaircaseState::Done;
            info!(final_level, "calibration run finished");
            return Ok(CycleDecision::Finished {
                report,
                final_level,
            });
        }

        if visibility_level < VISIBILITY_MIN {
            warn!(
                visibility_level,
                "visibility level fell below {VISIBILITY_MIN}"
            );
        }
        self.track.visibility_level = visibility_level;
        self.state = StaircaseState::RunningCycle;
        Ok(CycleDecision::Continue(report))
    }

    /// Hands out the finished run's level and replays the initial state.
    pub fn restart(&mut self) -> Result<i32> {
        if self.state != StaircaseState::Done {
            return Err(Error::RunInProgress);
        }
        let final_level = self
            .track
            .final_visibility_level
            .ok_or(Error::RunInProgress)?;
        self.track = CalibrationTrack::new(self.config.initial_visibility_level);
        self.recorder = TrialRecorder::new();
        self.history.clear();
        self.cycle.reset();
        self.state = StaircaseState::RunningCycle;
        Ok(final_level)
    }

    pub fn state(&self) -> StaircaseState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == StaircaseState::Done
    }

    pub fn config(&self) -> &StaircaseConfig {
        &self.config
    }

    pub fn track(&self) -> &CalibrationTrack {
        &self.track
    }

    pub fn visibility_level(&self) -> i32 {
        self.track.visibility_level
    }

    pub fn final_visibility_level(&self) -> Option<i32> {
        self.track.final_visibility_level
    }

    /// Trials recorded so far in the running cycle.
    pub fn cycle_trials(&self) -> usize {
        self.cycle.recorded()
    }

    pub fn recorder(&self) -> &TrialRecorder {
        &self.recorder
    }

    pub fn history(&self) -> &[CycleReport] {
        &self.history
    }
}

/// Percentage of correct outcomes, rounded half-up.
pub fn accuracy(outcomes: &[TrialOutcome]) -> Result<u8> {
    if outcomes.is_empty() {
        return Err(Error::EmptyCycle);
    }
    let correct = outcomes.iter().filter(|o| o.correct()).count() as i64;
    let total = outcomes.len() as i64;
    Ok(round_half_up(100 * correct, total) as u8)
}

/// The staircase step: outside the accuracy band, move a tenth of the
/// distance to the target. Only the top is clamped unless `clamp_floor`.
pub fn adjust_level(config: &StaircaseConfig, level: i32, accuracy: u8) -> i32 {
    let accuracy = i64::from(accuracy);
    let target = i64::from(config.accuracy_target);

    let next = if accuracy > i64::from(config.accuracy_upper_bound) {
        i64::from(level) - round_half_up(accuracy - target, 10)
    } else if accuracy < i64::from(config.accuracy_lower_bound) {
        i64::from(level) + round_half_up(target - accuracy, 10)
    } else {
        i64::from(level)
    };

    let next = next.min(i64::from(VISIBILITY_MAX)) as i32;
    if config.clamp_floor {
        next.max(VISIBILITY_MIN)
    } else {
        next
    }
}

/// `num / den` rounded to the nearest integer, ties toward +inf. `den > 0`.
fn round_half_up(num: i64, den: i64) -> i64 {
    (2 * num + den).div_euclid(2 * den)
}
