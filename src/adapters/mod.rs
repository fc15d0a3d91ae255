pub mod admin;
pub mod api_errors;
pub mod flutterwave;
pub mod lygos;
pub mod mail;
pub mod mock;
pub mod receipt;
pub mod routes;

/// Provider payloads are loosely typed; ids in particular show up as either
/// strings or numbers depending on the endpoint.
pub(crate) fn json_id(value: Option<&serde_json::Value>) -> Option<String> {
    match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn json_str(value: Option<&serde_json::Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
