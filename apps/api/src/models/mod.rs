pub mod resume;
pub mod verdict;

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

// Tolerant field coercion for model-produced JSON.
// Models emit `null` for "unknown", numbers where strings were asked for, and
// single-element lists where a scalar was expected. These helpers absorb that.

/// Treats an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A list of strings where `null` means empty. Null and nested items are dropped,
/// numbers and bools become text.
pub(crate) fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().filter_map(scalar_text).collect()),
        Some(other) => Err(de::Error::custom(format!(
            "expected a list of strings, found {other}"
        ))),
    }
}

/// A list of records where `null` means empty and `null` items are skipped.
pub(crate) fn records_without_nulls<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<Option<T>>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect())
}

/// Accepts a string, number, bool, or list of scalars as an optional string.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            Ok((!parts.is_empty()).then(|| parts.join(", ")))
        }
        Some(Value::Object(_)) => Err(de::Error::custom("expected a string, found an object")),
        Some(other) => Ok(scalar_text(&other)),
    }
}

/// Like `lenient_string`, but a missing value becomes an empty string.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
