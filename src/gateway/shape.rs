//! Classification of the creation response into one of the known gateway shapes.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    /// `{ "data": { "task_id" | "id": .. } }`
    TaskHandle(String),
    /// `{ "data": [ { "task_id" | "id": .. } ] }`
    TaskHandleList(String),
    /// `{ "data": [ { "url": .. } ] }`
    DirectResultList(String),
    /// `{ "data": [ { "b64_json": .. } ] }`
    InlineResultList(String),
    Unrecognized(Value),
}

/// Resolution order: task handle, list of task handles, list of URLs, list of inline data.
pub fn classify(payload: Value) -> GatewayResponse {
    match payload.get("data") {
        Some(Value::Object(_)) => {
            if let Some(id) = task_id_of(&payload["data"]) {
                return GatewayResponse::TaskHandle(id);
            }
        }
        Some(Value::Array(items)) => {
            if let Some(first) = items.first().filter(|v| v.is_object()) {
                if let Some(id) = task_id_of(first) {
                    return GatewayResponse::TaskHandleList(id);
                }
                if let Some(url) = non_empty_str(first.get("url")) {
                    return GatewayResponse::DirectResultList(url);
                }
                if let Some(b64) = non_empty_str(first.get("b64_json")) {
                    return GatewayResponse::InlineResultList(b64);
                }
            }
        }
        _ => {}
    }
    GatewayResponse::Unrecognized(payload)
}

/// `task_id`, falling back to `id`. Strings and numbers are both accepted.
pub fn task_id_of(v: &Value) -> Option<String> {
    id_field(v.get("task_id")).or_else(|| id_field(v.get("id")))
}

fn id_field(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::Number(n) => Some(n.to_string()),
        other => non_empty_str(Some(other)),
    }
}

fn non_empty_str(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
