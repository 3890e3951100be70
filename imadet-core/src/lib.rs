pub mod condition;
pub mod response;
pub mod sequence;
pub mod stimulus;
pub mod trial;

pub use condition::{Condition, Imagery, ImageryKey};
pub use response::{Response, ResponseKey, ResponseMapping};
pub use sequence::{NOISE_FRAME_COUNT, generate_image_sequence};
pub use stimulus::{AnimationConfig, ImageSequenceType, Orientation};
pub use trial::TrialOutcome;
