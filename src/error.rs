//! Error taxonomy for plan validation and gateway execution.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Missing credential/URL, empty plan, bad plan item. Raised before any network call.
    #[error("{0}")]
    Config(String),

    #[error("Unrecognized response shape: {0}")]
    UnrecognizedShape(Value),

    #[error("Task {task_id} failed: {payload}")]
    TaskFailed { task_id: String, payload: Value },

    #[error("Task {task_id} success but image url missing: {payload}")]
    MissingImageUrl { task_id: String, payload: Value },

    #[error("Task {task_id} timed out after {:.1}s", .elapsed.as_secs_f64())]
    TimedOut { task_id: String, elapsed: Duration },

    #[error("HTTP {status} from {url}: {body}")]
    Http { url: String, status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid inline image data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerateError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_task_and_elapsed() {
        let err = GenerateError::TimedOut { task_id: "t-9".into(), elapsed: Duration::from_millis(181_500) };
        assert_eq!(err.to_string(), "Task t-9 timed out after 181.5s");
        assert!(!err.is_config());
    }

    #[test]
    fn failure_message_carries_payload() {
        let payload = serde_json::json!({"data": {"status": "failed"}});
        let err = GenerateError::TaskFailed { task_id: "abc".into(), payload };
        assert!(err.to_string().contains("\"status\":\"failed\""));
    }
}
