use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a string, number or boolean and keep its textual form.
///
/// `null` and a missing field both become `None`. Arrays and objects are rejected.
pub fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => display_scalar(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("expected a string or number")),
    }
}

/// Textual form of a JSON scalar, exactly as the caller supplied it.
///
/// Strings are returned without quotes and numbers use their JSON representation.
pub fn display_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
