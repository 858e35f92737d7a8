//! Forgiving deserializers for the fields models most often get wrong.
//!
//! Monetary amounts arrive as numbers, as strings like `"$45"` or `"1,200"`,
//! or not at all. Every amount resolves to a finite, non-negative `f64`.
//! Free-text fields accept numbers and booleans, and list fields accept
//! anything. Once `days` is known to be an array, conversion cannot fail.

use std::sync::LazyLock;

use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

use super::itinerary::Coordinates;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number regex"));

/// Coerce any JSON value into a non-negative amount; unusable input becomes `0.0`.
pub fn amount_from_value(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => parse_amount(text),
        _ => 0.0,
    };
    non_negative(raw)
}

fn parse_amount(text: &str) -> f64 {
    let without_grouping = text.replace(',', "");
    NUMBER_RE
        .find(&without_grouping)
        .and_then(|found| found.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value))
}

/// Strings as-is, numbers and booleans stringified, anything else empty.
pub fn text_from_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

/// Object entries of an array that convert into `T`, in order.
///
/// A non-array becomes an empty list; non-object entries are skipped.
pub fn objects_from_value<T: DeserializeOwned>(value: Value) -> Vec<T> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

pub fn objects<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(objects_from_value(value))
}

/// A nested object, or its default when the model sent some other shape.
pub fn object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Day ordinals: integers, floats with no fraction, or numeric strings.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| v.fract() == 0.0 && *v >= 0.0).map(|v| v as u64)),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(parsed.map(|v| v.min(u32::MAX as u64) as u32).unwrap_or(0))
}

/// A coordinate object counts only when both halves are usable numbers.
///
/// `lng` also accepts the `lon` spelling. A partial pair deserializes to `None`.
pub fn coordinates<'de, D>(deserializer: D) -> Result<Option<Coordinates>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coordinates_from_value(&value))
}

pub fn coordinates_from_value(value: &Value) -> Option<Coordinates> {
    let object = value.as_object()?;
    let lat = object.get("lat").and_then(coordinate_component)?;
    let lng = object
        .get("lng")
        .or_else(|| object.get("lon"))
        .and_then(coordinate_component)?;
    Coordinates::new(lat, lng)
}

fn coordinate_component(value: &Value) -> Option<f64> {
    let component = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    component.filter(|v| v.is_finite())
}

/// Remove `null` object members recursively so serde defaults apply to them.
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, member)| !member.is_null())
                .map(|(key, member)| (key, strip_nulls(member)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}
