//! Field decoders that never fail on absent, null or malformed wire values.
//!
//! Extraction output and older stored orders routinely carry `null` dates and
//! numbers encoded as strings; all of those collapse to `""` or `0`.

use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::OrderId;

/// Parses user or wire supplied numeric text, yielding 0 for anything that
/// is not a finite number.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    match trimmed.replace(',', "").parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(text)) => parse_amount(&text),
        _ => 0.0,
    })
}

fn order_id_from(value: Option<Value>) -> Option<OrderId> {
    match value? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
    .map(OrderId)
}

/// An order id given as a number or numeric string. Anything else is an
/// error, so the enclosing row can be dropped by [`list`].
pub(crate) fn order_id<'de, D>(deserializer: D) -> Result<OrderId, D::Error>
where
    D: Deserializer<'de>,
{
    order_id_from(Option::<Value>::deserialize(deserializer)?)
        .ok_or_else(|| D::Error::custom("expected an order id"))
}

pub(crate) fn optional_order_id<'de, D>(deserializer: D) -> Result<Option<OrderId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(order_id_from(Option::<Value>::deserialize(deserializer)?))
}

/// Decodes a nested block, falling back to its default for `null` or a value
/// of the wrong shape.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default())
}

/// Decodes a list, dropping entries that cannot be read.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(entries(Option::<Value>::deserialize(deserializer)?.unwrap_or_default()))
}

/// The readable entries of a JSON array; anything but an array is empty.
pub(crate) fn entries<T: serde::de::DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    }
}
