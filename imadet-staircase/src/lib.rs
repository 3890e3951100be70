pub mod config;
pub mod controller;
pub mod error;
pub mod experiment;
pub mod practice;
pub mod recorder;
pub mod session;

pub use config::{
    MainExperimentConfig, PracticeConfig, SessionConfig, StaircaseConfig, VISIBILITY_MAX,
    VISIBILITY_MIN,
};
pub use controller::{
    CalibrationTrack, CycleDecision, CycleReport, StaircaseController, StaircaseState,
    accuracy, adjust_level,
};
pub use error::{Error, Result};
pub use experiment::{BlockSummary, MainExperiment};
pub use practice::{PracticeDecision, PracticeLoop, PracticeRoundReport};
pub use recorder::{BalancedCycle, TrialRecorder};
pub use session::{CalibrationSession, CycleLogEntry, ParticipantVisibility};
