use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Rejected at setup, before any trial runs.
    #[error("invalid staircase configuration: {0}")]
    InvalidConfiguration(String),

    #[error("cycle evaluated with {recorded} of {required} trials recorded")]
    IncompleteCycle { recorded: usize, required: usize },

    #[error("cycle already holds {required} trials; evaluate it before recording more")]
    CycleFull { required: usize },

    /// A cycle must present the target in exactly half of its trials.
    #[error("cycle of {required} trials would hold {present} target-present and {absent} target-absent trials")]
    UnbalancedCycle {
        present: usize,
        absent: usize,
        required: usize,
    },

    #[error("calibration run already finished")]
    RunFinished,

    #[error("calibration run still in progress")]
    RunInProgress,

    /// Accuracy over zero trials is undefined.
    #[error("cannot compute accuracy over an empty cycle")]
    EmptyCycle,

    #[error("calibration session has unfinished tracks")]
    SessionIncomplete,

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
