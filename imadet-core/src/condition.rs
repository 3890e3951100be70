use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stimulus::Orientation;

/// What the participant is asked to imagine during a main block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Imagery {
    Nothing,
    LeftTilted,
    RightTilted,
}

impl Imagery {
    /// Answer expected on the imagery check after the block.
    pub fn expected_key(self) -> ImageryKey {
        match self {
            Imagery::Nothing => ImageryKey::N,
            Imagery::LeftTilted => ImageryKey::L,
            Imagery::RightTilted => ImageryKey::R,
        }
    }
}

/// Keys of the post-block imagery check: left, right, nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageryKey {
    L,
    R,
    N,
}

/// One display x imagine cell of the main experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub display: Orientation,
    pub imagine: Imagery,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::new(Orientation::LeftTilted, Imagery::Nothing),
        Condition::new(Orientation::LeftTilted, Imagery::LeftTilted),
        Condition::new(Orientation::LeftTilted, Imagery::RightTilted),
        Condition::new(Orientation::RightTilted, Imagery::Nothing),
        Condition::new(Orientation::RightTilted, Imagery::LeftTilted),
        Condition::new(Orientation::RightTilted, Imagery::RightTilted),
    ];

    pub const fn new(display: Orientation, imagine: Imagery) -> Self {
        Self { display, imagine }
    }

    /// Imagery matches the displayed tilt.
    pub fn is_congruent(&self) -> bool {
        matches!(
            (self.display, self.imagine),
            (Orientation::LeftTilted, Imagery::LeftTilted)
                | (Orientation::RightTilted, Imagery::RightTilted)
        )
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display = match self.display {
            Orientation::LeftTilted => "left",
            Orientation::RightTilted => "right",
        };
        let imagine = match self.imagine {
            Imagery::Nothing => "nothing",
            Imagery::LeftTilted => "left",
            Imagery::RightTilted => "right",
        };
        write!(f, "display_{display}_imagine_{imagine}")
    }
}
