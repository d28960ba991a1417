//! Domain error types.
//!
//! Validation failures are separated from storage failures so the desk can
//! alert the user about the former and propagate the latter.

use thiserror::Error;

/// Rejected form input. No store mutation happens when one of these is returned.
///
/// Form field errors share one user-facing message; the offending input is kept
/// in the variant for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid task, date, and time.")]
    MissingTitle,

    #[error("Please enter a valid task, date, and time.")]
    InvalidDate(String),

    #[error("Please enter a valid task, date, and time.")]
    InvalidHour(String),

    #[error("Please enter a valid task, date, and time.")]
    InvalidMinute(String),

    #[error("Unknown meridiem '{0}', expected AM or PM")]
    InvalidMeridiem(String),

    #[error("Unknown priority '{0}', expected low, medium or high")]
    InvalidPriority(String),

    #[error("Unknown repeat policy '{0}', expected none, daily or weekly")]
    InvalidRepeat(String),

    /// Wall-clock time that does not exist locally (DST gap)
    #[error("{0} does not exist in the local timezone")]
    NonexistentLocalTime(String),

    #[error("Reminder time must be in the future.")]
    DueInPast,
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("stored collection '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TaskError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }
}
