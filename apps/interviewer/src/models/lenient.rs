//! Lenient field decoders for model-produced JSON.
//!
//! The language model does not always honour the requested types: a field
//! asked for as a string may come back as an array, a score as `"72"`. These
//! helpers accept the reasonable variants instead of failing the whole reply.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Any JSON value as display text. Arrays are joined line by line; `null` is empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(&Value::deserialize(deserializer)?))
}

/// A list of strings. A single comma-separated string is split; `null` is empty.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().map(value_to_text).collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Null => Vec::new(),
        other => vec![value_to_text(&other)],
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// A 0–100 score. Floats are truncated toward zero so a fractional score never
/// crosses an integer threshold, numeric strings (optionally with `%`) are
/// parsed, out-of-range values are clamped, and anything else is 0.
pub fn score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?)
        .map(|v| v.floor().clamp(0.0, 100.0) as u32)
        .unwrap_or(0))
}

/// A question count: a non-negative integral number, written as `2`, `2.0`
/// or `"2"`. `None` for anything else.
pub fn count(value: &Value) -> Option<u32> {
    number(value)
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32)
}

fn number(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|v| v.is_finite())
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}: {}", value_to_text(v)))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}
