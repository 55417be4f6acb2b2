use thiserror::Error;

/// Errors raised by the timecard core.
///
/// "No active session" is not an error; see
/// [`ClockOutOutcome`](crate::tracker::ClockOutOutcome).
#[derive(Debug, Error)]
pub enum TimecardError {
    /// Input rejected before any state was touched.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TimecardError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TimecardError>;
