use serde::{Deserialize, Serialize};

/// Tilt of the grating presented during a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    LeftTilted,
    RightTilted,
}

impl Orientation {
    pub const BOTH: [Orientation; 2] = [Orientation::LeftTilted, Orientation::RightTilted];
}

/// Kind of animation shown in a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSequenceType {
    Noise,
    Grating(Orientation),
}

impl ImageSequenceType {
    /// Numeric code baked into the stimulus file names.
    pub fn code(&self) -> u8 {
        match self {
            ImageSequenceType::Noise => 0,
            ImageSequenceType::Grating(Orientation::LeftTilted) => 1,
            ImageSequenceType::Grating(Orientation::RightTilted) => 2,
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self, ImageSequenceType::Noise)
    }

    /// Trial kind for a given ground truth within an orientation's track.
    pub fn for_trial(orientation: Orientation, stimulus_present: bool) -> Self {
        if stimulus_present {
            ImageSequenceType::Grating(orientation)
        } else {
            ImageSequenceType::Noise
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub frames: usize,
    pub duration_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: 20,
            duration_ms: 2000,
        }
    }
}

impl AnimationConfig {
    /// Per-frame display time, rounded half-up to whole milliseconds.
    pub fn frame_time_ms(&self) -> u64 {
        if self.frames == 0 {
            return 0;
        }
        let frames = self.frames as u64;
        (2 * self.duration_ms + frames) / (2 * frames)
    }
}
