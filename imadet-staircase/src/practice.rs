use imadet_core::{ImageSequenceType, Orientation, Response, TrialOutcome};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::{PracticeConfig, VISIBILITY_MAX, VISIBILITY_MIN};
use super::controller::accuracy;
use super::error::{Error, Result};
use super::recorder::TrialRecorder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeRoundReport {
    pub round: usize,
    pub accuracy: u8,
    pub visibility_level: i32,
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeDecision {
    /// Another round follows, one level more visible.
    Retry(PracticeRoundReport),
    Passed(PracticeRoundReport),
}

impl PracticeDecision {
    pub fn report(&self) -> &PracticeRoundReport {
        match self {
            PracticeDecision::Retry(report) | PracticeDecision::Passed(report) => report,
        }
    }
}

/// Detection practice: rounds of left, right and noise animations until a
/// round is passed. Every failed round makes the gratings one level easier
/// to see, up to `VISIBILITY_MAX`.
#[derive(Debug, Clone)]
pub struct PracticeLoop {
    config: PracticeConfig,
    visibility_level: i32,
    round: usize,
    round_trials: usize,
    recorder: TrialRecorder,
    passed: bool,
    history: Vec<PracticeRoundReport>,
}

impl PracticeLoop {
    pub fn new(config: PracticeConfig, initial_level: i32) -> Result<Self> {
        config.validate()?;
        if !(VISIBILITY_MIN..=VISIBILITY_MAX).contains(&initial_level) {
            return Err(Error::InvalidConfiguration(format!(
                "practice level {initial_level} outside [{VISIBILITY_MIN}, {VISIBILITY_MAX}]"
            )));
        }
        Ok(Self {
            config,
            visibility_level: initial_level,
            round: 0,
            round_trials: 0,
            recorder: TrialRecorder::new(),
            passed: false,
            history: Vec::new(),
        })
    }

    pub fn trials_per_round(&self) -> usize {
        3 * self.config.repetitions
    }

    /// Animation kinds of the next round in presentation order.
    pub fn round_plan<R: Rng>(&self, rng: &mut R) -> Vec<ImageSequenceType> {
        let triple = [
            ImageSequenceType::Grating(Orientation::LeftTilted),
            ImageSequenceType::Grating(Orientation::RightTilted),
            ImageSequenceType::Noise,
        ];
        let mut plan: Vec<_> = triple
            .iter()
            .copied()
            .cycle()
            .take(self.trials_per_round())
            .collect();
        plan.shuffle(rng);
        plan
    }

    pub fn record(&mut self, stimulus_present: bool, response: Response) -> Result<TrialOutcome> {
        if self.passed {
            return Err(Error::RunFinished);
        }
        if self.round_trials == self.trials_per_round() {
            return Err(Error::CycleFull {
                required: self.trials_per_round(),
            });
        }
        self.round_trials += 1;
        Ok(self.recorder.record(stimulus_present, response))
    }

    pub fn evaluate(&mut self) -> Result<PracticeDecision> {
        if self.passed {
            return Err(Error::RunFinished);
        }
        let required = self.trials_per_round();
        if self.round_trials < required {
            return Err(Error::IncompleteCycle {
                recorded: self.round_trials,
                required,
            });
        }

        let accuracy = accuracy(self.recorder.tail(required))?;
        self.round += 1;
        self.round_trials = 0;
        let passed = accuracy > self.config.pass_accuracy;
        let report = PracticeRoundReport {
            round: self.round,
            accuracy,
            visibility_level: self.visibility_level,
            passed,
        };
        self.history.push(report);
        info!(round = self.round, accuracy, passed, "practice round evaluated");

        if passed {
            self.passed = true;
            Ok(PracticeDecision::Passed(report))
        } else {
            self.visibility_level = (self.visibility_level + 1).min(VISIBILITY_MAX);
            Ok(PracticeDecision::Retry(report))
        }
    }

    pub fn visibility_level(&self) -> i32 {
        self.visibility_level
    }

    pub fn is_passed(&self) -> bool {
        self.passed
    }

    pub fn history(&self) -> &[PracticeRoundReport] {
        &self.history
    }
}
