use serde::{Deserialize, Serialize};

use crate::response::Response;

/// One recorded detection response.
///
/// Built once when the response comes in and never mutated afterwards; the
/// `correct` flag is derived from the other two at construction, and is
/// recomputed rather than trusted when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordedTrial")]
pub struct TrialOutcome {
    stimulus_present: bool,
    responded_present: bool,
    correct: bool,
}

/// Wire shape accepted on input; any `correct` field is ignored.
#[derive(Deserialize)]
struct RecordedTrial {
    stimulus_present: bool,
    responded_present: bool,
}

impl From<RecordedTrial> for TrialOutcome {
    fn from(raw: RecordedTrial) -> Self {
        let response = if raw.responded_present {
            Response::Present
        } else {
            Response::Absent
        };
        TrialOutcome::new(raw.stimulus_present, response)
    }
}

impl TrialOutcome {
    pub fn new(stimulus_present: bool, response: Response) -> Self {
        let responded_present = response.is_present();
        Self {
            stimulus_present,
            responded_present,
            correct: responded_present == stimulus_present,
        }
    }

    /// Was a grating embedded in the animation.
    pub fn stimulus_present(&self) -> bool {
        self.stimulus_present
    }

    pub fn responded_present(&self) -> bool {
        self.responded_present
    }

    pub fn correct(&self) -> bool {
        self.correct
    }
}
