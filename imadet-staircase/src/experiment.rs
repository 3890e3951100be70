use imadet_core::{
    Condition, ImageSequenceType, ImageryKey, ResponseKey, ResponseMapping, TrialOutcome,
    generate_image_sequence,
};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::SessionConfig;
use super::controller::accuracy;
use super::error::{Error, Result};
use super::recorder::{BalancedCycle, TrialRecorder};
use super::session::ParticipantVisibility;

/// Result of one main-experiment block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub block: usize,
    pub condition: Condition,
    pub accuracy: u8,
    pub imagery_key: ImageryKey,
    pub imagery_correct: bool,
}

/// The imagery experiment run on the calibrated levels.
///
/// Every condition appears `condition_repetitions` times in one shuffled
/// block order. Each block holds a balanced set of detection trials shown at
/// the participant's level for the displayed tilt, and ends with an imagery
/// check.
pub struct MainExperiment<R: Rng> {
    config: SessionConfig,
    visibility: ParticipantVisibility,
    mapping: ResponseMapping,
    rng: R,
    blocks: Vec<Condition>,
    block_index: usize,
    cycle: BalancedCycle,
    recorder: TrialRecorder,
    summaries: Vec<BlockSummary>,
}

impl<R: Rng> MainExperiment<R> {
    pub fn new(
        config: SessionConfig,
        visibility: ParticipantVisibility,
        mapping: ResponseMapping,
        mut rng: R,
    ) -> Result<Self> {
        config.validate()?;
        let mut blocks: Vec<Condition> = (0..config.main.condition_repetitions)
            .flat_map(|_| Condition::ALL)
            .collect();
        blocks.shuffle(&mut rng);
        let cycle = BalancedCycle::new(config.main.trials_per_condition);
        info!(
            blocks = blocks.len(),
            left = visibility.left,
            right = visibility.right,
            "main experiment started"
        );

        Ok(Self {
            config,
            visibility,
            mapping,
            rng,
            blocks,
            block_index: 0,
            cycle,
            recorder: TrialRecorder::new(),
            summaries: Vec::new(),
        })
    }

    pub fn block_order(&self) -> &[Condition] {
        &self.blocks
    }

    pub fn current_condition(&self) -> Option<Condition> {
        self.blocks.get(self.block_index).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.block_index >= self.blocks.len()
    }

    /// Presence flags for the current block: half present, shuffled.
    pub fn trial_plan(&mut self) -> Vec<bool> {
        let n = self.config.main.trials_per_condition;
        let mut plan: Vec<bool> = (0..n).map(|i| i < n / 2).collect();
        plan.shuffle(&mut self.rng);
        plan
    }

    pub fn stimulus_frames(&mut self, stimulus_present: bool) -> Result<Vec<String>> {
        let condition = self.current_condition().ok_or(Error::RunFinished)?;
        let kind = ImageSequenceType::for_trial(condition.display, stimulus_present);
        let end_level = if kind.is_noise() {
            1
        } else {
            self.visibility.level(condition.display)
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
        self.cycle.admit(stimulus_present)?;
        let response = self.mapping.interpret(key);
        Ok(self.recorder.record(stimulus_present, response))
    }

    /// Scores the imagery check that closes a block and moves on.
    pub fn check_imagery(&mut self, key: ImageryKey) -> Result<BlockSummary> {
        let condition = self.current_condition().ok_or(Error::RunFinished)?;
        self.cycle.ensure_full()?;
        let accuracy = accuracy(self.recorder.tail(self.cycle.size()))?;

        let summary = BlockSummary {
            block: self.block_index + 1,
            condition,
            accuracy,
            imagery_key: key,
            imagery_correct: key == condition.imagine.expected_key(),
        };
        self.summaries.push(summary);
        self.cycle.reset();
        self.block_index += 1;
        info!(
            block = summary.block,
            condition = %condition,
            accuracy,
            imagery_correct = summary.imagery_correct,
            "block finished"
        );
        Ok(summary)
    }

    pub fn summaries(&self) -> &[BlockSummary] {
        &self.summaries
    }
}
