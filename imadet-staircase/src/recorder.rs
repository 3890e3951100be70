use imadet_core::{Response, TrialOutcome};

use crate::error::{Error, Result};

/// Append-only outcome log of one track.
#[derive(Debug, Clone, Default)]
pub struct TrialRecorder {
    outcomes: Vec<TrialOutcome>,
}

impl TrialRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stimulus_present: bool, response: Response) -> TrialOutcome {
        let outcome = TrialOutcome::new(stimulus_present, response);
        self.outcomes.push(outcome);
        outcome
    }

    /// The last `n` outcomes, oldest first. Shorter if fewer were recorded.
    pub fn tail(&self, n: usize) -> &[TrialOutcome] {
        let start = self.outcomes.len().saturating_sub(n);
        &self.outcomes[start..]
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> &[TrialOutcome] {
        &self.outcomes
    }
}

/// Counts the trials of a cycle that must hold as many target-present as
/// target-absent trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancedCycle {
    size: usize,
    recorded: usize,
    present: usize,
}

impl BalancedCycle {
    /// `size` must be even.
    pub fn new(size: usize) -> Self {
        debug_assert!(size % 2 == 0);
        Self {
            size,
            recorded: 0,
            present: 0,
        }
    }

    /// Accounts for one more trial, refusing it if the cycle is full or the
    /// trial would tip the 50/50 split.
    pub fn admit(&mut self, stimulus_present: bool) -> Result<()> {
        if self.is_full() {
            return Err(Error::CycleFull {
                required: self.size,
            });
        }
        let half = self.size / 2;
        let present = self.present + usize::from(stimulus_present);
        let absent = self.recorded + 1 - present;
        if present > half || absent > half {
            return Err(Error::UnbalancedCycle {
                present,
                absent,
                required: self.size,
            });
        }
        self.recorded += 1;
        self.present = present;
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.recorded == self.size
    }

    pub fn recorded(&self) -> usize {
        self.recorded
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Fails with `IncompleteCycle` unless every slot is taken.
    pub fn ensure_full(&self) -> Result<()> {
        if self.is_full() {
            Ok(())
        } else {
            Err(Error::IncompleteCycle {
                recorded: self.recorded,
                required: self.size,
            })
        }
    }

    pub fn reset(&mut self) {
        self.recorded = 0;
        self.present = 0;
    }
}
