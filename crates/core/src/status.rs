//! Store status codes, the public status vocabulary, and the mapping between them.

use core::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::StatusError;
use crate::position::QueuePosition;

/// Status code as written by workers into a result record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StoreStatusCode {
    Pending,
    Started,
    Success,
    Failure,
    Revoked,
}

impl StoreStatusCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatusCode::Pending => "PENDING",
            StoreStatusCode::Started => "STARTED",
            StoreStatusCode::Success => "SUCCESS",
            StoreStatusCode::Failure => "FAILURE",
            StoreStatusCode::Revoked => "REVOKED",
        }
    }

    /// Public status for this store code.
    pub fn public_status(self) -> JobStatus {
        match self {
            StoreStatusCode::Pending => JobStatus::Queued,
            StoreStatusCode::Started => JobStatus::Running,
            StoreStatusCode::Success => JobStatus::Complete,
            StoreStatusCode::Failure => JobStatus::Failed,
            StoreStatusCode::Revoked => JobStatus::Revoked,
        }
    }
}

impl FromStr for StoreStatusCode {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(StoreStatusCode::Pending),
            "STARTED" => Ok(StoreStatusCode::Started),
            "SUCCESS" => Ok(StoreStatusCode::Success),
            "FAILURE" => Ok(StoreStatusCode::Failure),
            "REVOKED" => Ok(StoreStatusCode::Revoked),
            other => Err(StatusError::unknown_code(other)),
        }
    }
}

/// Map a raw store code to the public vocabulary.
///
/// Unrecognized codes mean this component and the workers disagree on the
/// status enum; they are surfaced as `UnknownStatusCode`, never defaulted.
pub fn map_store_code(code: &str) -> Result<JobStatus, StatusError> {
    code.parse::<StoreStatusCode>().map(StoreStatusCode::public_status)
}

/// Public job status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "queued")]
    Queued,
    #[serde(rename = "starting")]
    Starting,
    #[serde(rename = "running")]
    Running,
    #[serde(rename = "complete")]
    Complete,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "revoked")]
    Revoked,
    #[serde(rename = "invalid token")]
    InvalidToken,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Starting => "starting",
            JobStatus::Running => "running",
            JobStatus::Complete => "complete",
            JobStatus::Failed => "failed",
            JobStatus::Revoked => "revoked",
            JobStatus::InvalidToken => "invalid token",
        }
    }
}

impl core::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a status query.
///
/// `queue_position` is only ever set together with `JobStatus::Queued`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<QueuePosition>,
}

impl StatusReport {
    pub fn queued(position: QueuePosition) -> Self {
        Self {
            status: JobStatus::Queued,
            queue_position: Some(position),
        }
    }

    pub fn starting() -> Self {
        Self::of(JobStatus::Starting)
    }

    pub fn invalid_token() -> Self {
        Self::of(JobStatus::InvalidToken)
    }

    /// Report without a queue position.
    pub fn of(status: JobStatus) -> Self {
        Self {
            status,
            queue_position: None,
        }
    }
}

/// Stored result of a job, as read from the result store.
///
/// `store_code` is kept verbatim; `status` is absent when the code is outside
/// the known set (e.g. a custom progress state written by the worker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    pub store_code: String,
    /// Success value or failure detail, as written by the worker.
    pub result: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_done: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_known_store_code() {
        assert_eq!(map_store_code("PENDING").unwrap(), JobStatus::Queued);
        assert_eq!(map_store_code("STARTED").unwrap(), JobStatus::Running);
        assert_eq!(map_store_code("SUCCESS").unwrap(), JobStatus::Complete);
        assert_eq!(map_store_code("FAILURE").unwrap(), JobStatus::Failed);
        assert_eq!(map_store_code("REVOKED").unwrap(), JobStatus::Revoked);
    }

    #[test]
    fn unknown_store_code_is_surfaced() {
        assert_eq!(
            map_store_code("RETRY"),
            Err(StatusError::UnknownStatusCode("RETRY".to_string()))
        );
        // Codes are case-sensitive.
        assert!(map_store_code("success").is_err());
    }

    #[test]
    fn store_code_round_trips_through_str() {
        for code in [
            StoreStatusCode::Pending,
            StoreStatusCode::Started,
            StoreStatusCode::Success,
            StoreStatusCode::Failure,
            StoreStatusCode::Revoked,
        ] {
            assert_eq!(code.as_str().parse::<StoreStatusCode>().unwrap(), code);
        }
    }

    #[test]
    fn report_serializes_position_only_when_queued() {
        let queued = StatusReport::queued(QueuePosition::new(2).unwrap());
        assert_eq!(
            serde_json::to_value(queued).unwrap(),
            serde_json::json!({"status": "queued", "queue_position": 2})
        );

        let invalid = StatusReport::invalid_token();
        assert_eq!(
            serde_json::to_value(invalid).unwrap(),
            serde_json::json!({"status": "invalid token"})
        );
    }
}
