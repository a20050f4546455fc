// Built-in OAuth2 provider descriptors and their profile normalizers.

pub mod facebook;
pub mod google;
pub mod windows_live;

use serde_json::Value;

/// Extract a field as a string, accepting string or numeric JSON values.
pub(crate) fn string_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract an optional string field, treating absent/null as empty.
pub(crate) fn optional_string(data: &Value, key: &str) -> String {
    string_field(data, key).unwrap_or_default()
}
