//! Task polling: a pure status classifier plus the extraction of the finished image URL.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Pending,
    Succeeded,
    Failed,
    TimedOut,
}

/// Maps a task status string onto the next state. Unknown or absent statuses keep polling.
pub fn transition(status: Option<&str>) -> PollState {
    match status.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("success" | "succeeded" | "completed") => PollState::Succeeded,
        Some("failed" | "error" | "canceled" | "cancelled") => PollState::Failed,
        _ => PollState::Pending,
    }
}

pub fn task_status(payload: &Value) -> Option<&str> {
    payload.get("data")?.get("status")?.as_str()
}

/// First URL of `data.result.images[0]`, read from `url` (string or list) or `urls` (list).
pub fn first_image_url(payload: &Value) -> Option<String> {
    let first = payload.get("data")?.get("result")?.get("images")?.as_array()?.first()?;
    [first.get("url"), first.get("urls")]
        .into_iter()
        .flatten()
        .find_map(url_of)
}

fn url_of(v: &Value) -> Option<String> {
    let s = match v {
        Value::String(s) => s.as_str(),
        Value::Array(items) => items.first()?.as_str()?,
        _ => return None,
    };
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
