//! Status resolution error model.

use thiserror::Error;

use crate::id::JobId;

/// Result type used across status resolution.
pub type StatusResult<T> = Result<T, StatusError>;

/// Error raised while resolving a job's status.
///
/// Only `StoreUnavailable`, `UnknownStatusCode` and `Cancelled` abort a
/// resolution. `MalformedRecord` and `PositionRace` are absorbed by the
/// resolver and degrade to the next precedence step.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// The shared store could not be reached or a round trip timed out.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A single stored record failed to parse or lacks a required field.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The store reported a status code this component does not know.
    #[error("unknown status code: {0}")]
    UnknownStatusCode(String),

    /// The job left the pending list between the membership check and the
    /// index lookup.
    #[error("job {0} vanished from the pending list")]
    PositionRace(JobId),

    /// Resolution was cancelled before the next store call.
    #[error("status resolution cancelled")]
    Cancelled,

    /// A job identifier failed validation.
    #[error("invalid job id: {0}")]
    InvalidJobId(String),
}

impl StatusError {
    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }

    pub fn unknown_code(code: impl Into<String>) -> Self {
        Self::UnknownStatusCode(code.into())
    }

    /// Whether a caller should retry the same query later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StatusError::StoreUnavailable(_) | StatusError::PositionRace(_) | StatusError::Cancelled
        )
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            StatusError::StoreUnavailable(_) => "store_unavailable",
            StatusError::MalformedRecord(_) => "malformed_record",
            StatusError::UnknownStatusCode(_) => "unknown_status_code",
            StatusError::PositionRace(_) => "position_race",
            StatusError::Cancelled => "cancelled",
            StatusError::InvalidJobId(_) => "invalid_job_id",
        }
    }
}
