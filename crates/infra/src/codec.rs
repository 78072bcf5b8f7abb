//! Decoding of records written by the broker and workers.
//!
//! The layouts are owned by the producers and treated as a fixed contract:
//!
//! - pending message: `{"headers": {"id": ..., "task": ...}, "body": ..., ...}`
//! - result record: `{"status": ..., "result": ..., "traceback": ..., "date_done": ...}`
//! - unacknowledged entry: `[{"headers": {"root_id": ...}, ...}, exchange, routing_key]`

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use jobstatus_core::{JobId, JobOutcome, StatusError, StoreStatusCode, map_store_code};

#[derive(Debug, Deserialize)]
struct PendingMessage {
    headers: PendingHeaders,
}

#[derive(Debug, Deserialize)]
struct PendingHeaders {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawResultRecord {
    status: String,
    #[serde(default)]
    result: JsonValue,
    #[serde(default)]
    traceback: Option<String>,
    #[serde(default)]
    date_done: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnackedMessage {
    headers: UnackedHeaders,
}

#[derive(Debug, Deserialize)]
struct UnackedHeaders {
    root_id: String,
}

fn parse_json<'a, T: Deserialize<'a>>(kind: &str, raw: &'a [u8]) -> Result<T, StatusError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| StatusError::malformed(format!("{kind}: not utf-8: {e}")))?;
    serde_json::from_str(text).map_err(|e| StatusError::malformed(format!("{kind}: {e}")))
}

/// Extract the job id from a pending-list message.
pub fn decode_pending_id(raw: &[u8]) -> Result<JobId, StatusError> {
    let message: PendingMessage = parse_json("pending message", raw)?;
    Ok(JobId::from(message.headers.id))
}

/// Extract the root job id from an unacknowledged-hash entry.
pub fn decode_unacked_root_id(raw: &[u8]) -> Result<JobId, StatusError> {
    let entry: Vec<JsonValue> = parse_json("unacknowledged entry", raw)?;
    let first = entry
        .into_iter()
        .next()
        .ok_or_else(|| StatusError::malformed("unacknowledged entry: empty array"))?;
    let message: UnackedMessage = serde_json::from_value(first)
        .map_err(|e| StatusError::malformed(format!("unacknowledged entry: {e}")))?;
    Ok(JobId::from(message.headers.root_id))
}

/// Decode a result record.
///
/// Unparseable bytes or a missing `status` yield `MalformedRecord`. A status
/// outside the known set decodes with `status: None`; callers that need a
/// public status decide what that means.
pub fn decode_result(raw: &[u8]) -> Result<JobOutcome, StatusError> {
    let record: RawResultRecord = parse_json("result record", raw)?;

    Ok(JobOutcome {
        status: map_store_code(&record.status).ok(),
        store_code: record.status,
        result: record.result,
        traceback: record.traceback,
        // An unparseable timestamp drops only the timestamp.
        date_done: record.date_done.as_deref().and_then(parse_date_done),
    })
}

fn parse_date_done(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Serialize a pending message carrying `job_id`.
pub fn encode_pending(job_id: &JobId, task: &str) -> Vec<u8> {
    serde_json::json!({
        "body": "",
        "content-encoding": "utf-8",
        "content-type": "application/json",
        "headers": {
            "id": job_id.as_str(),
            "root_id": job_id.as_str(),
            "task": task,
        },
        "properties": {
            "correlation_id": job_id.as_str(),
            "delivery_mode": 2,
        },
    })
    .to_string()
    .into_bytes()
}

/// Serialize a result record.
pub fn encode_result(job_id: &JobId, code: StoreStatusCode, result: JsonValue) -> Vec<u8> {
    serde_json::json!({
        "status": code.as_str(),
        "result": result,
        "traceback": null,
        "children": [],
        "date_done": null,
        "task_id": job_id.as_str(),
    })
    .to_string()
    .into_bytes()
}

/// Serialize an unacknowledged-hash entry whose root id is `job_id`.
pub fn encode_unacked(job_id: &JobId) -> Vec<u8> {
    serde_json::json!([
        {
            "body": "",
            "headers": {
                "id": job_id.as_str(),
                "root_id": job_id.as_str(),
            },
        },
        "",
        "celery",
    ])
    .to_string()
    .into_bytes()
}
