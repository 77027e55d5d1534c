//! Error types for bill loading, recurrence expansion and settings

use thiserror::Error;

/// Errors raised before a simulation starts.
///
/// The simulation fold itself cannot fail once it has valid bills, so every
/// variant here is a construction-time problem that aborts the whole run.
#[derive(Error, Debug)]
pub enum ProjectionError {
    /// A bill record has a malformed or missing field
    #[error("Invalid bill '{record}': {reason}")]
    InvalidArgument { record: String, reason: String },

    /// Recurrence unit is not days/months, or the count is not positive
    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    /// Month arithmetic produced a day that does not exist in the target month
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Simulation settings are inconsistent
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProjectionError {
    /// Build an `InvalidArgument` for the named record
    pub fn invalid_argument(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            record: record.into(),
            reason: reason.into(),
        }
    }

    /// Prefix recurrence/date errors with the bill they came from
    pub fn for_record(self, record: &str) -> Self {
        match self {
            Self::InvalidRecurrence(msg) => {
                Self::InvalidRecurrence(format!("bill '{record}': {msg}"))
            }
            Self::InvalidDate(msg) => Self::InvalidDate(format!("bill '{record}': {msg}")),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
