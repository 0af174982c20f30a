//! Field probing over raw backend records.
//!
//! The live service returns different shapes for the same entity depending
//! on load state, post type, and which endpoint produced it: numbers arrive
//! as JSON numbers or as numeric strings, booleans as `0`/`1` in either
//! form, and whole field groups are simply absent on stub records. These
//! helpers centralize that tolerance:
//!
//! - `required_*` extractors fail with a [`MapError`] naming the field and
//!   carrying the original payload for diagnostics;
//! - `optional_*` extractors probe independently and map absence to `None`
//!   rather than failing the whole record, so a degraded ("stub") entity
//!   still maps and callers can re-fetch later for the full shape.
//!
//! A present-but-unusable value is always an error, even for optional
//! fields; only *absence* is tolerated.

use serde_json::Value;

use crate::errors::MapError;

pub(crate) fn required_str(raw: &Value, field: &'static str) -> Result<String, MapError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(missing(raw, field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(malformed(raw, field, format!("expected a string, got {other}"))),
    }
}

/// String field that tolerates a numeric wire value (IDs and timestamps
/// arrive in both forms).
pub(crate) fn required_stringy(raw: &Value, field: &'static str) -> Result<String, MapError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(missing(raw, field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(malformed(
            raw,
            field,
            format!("expected a string or number, got {other}"),
        )),
    }
}

pub(crate) fn required_int(raw: &Value, field: &'static str) -> Result<i64, MapError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(missing(raw, field)),
        Some(value) => int_value(value)
            .ok_or_else(|| malformed(raw, field, format!("expected an integer, got {value}"))),
    }
}

pub(crate) fn required_float(raw: &Value, field: &'static str) -> Result<f64, MapError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(missing(raw, field)),
        Some(value) => float_value(value)
            .ok_or_else(|| malformed(raw, field, format!("expected a number, got {value}"))),
    }
}

/// Boolean flag encoded as `true`/`false`, `0`/`1`, or `"0"`/`"1"`.
pub(crate) fn required_flag(raw: &Value, field: &'static str) -> Result<bool, MapError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(missing(raw, field)),
        Some(value) => flag_value(value)
            .ok_or_else(|| malformed(raw, field, format!("expected a 0/1 flag, got {value}"))),
    }
}

pub(crate) fn optional_str(raw: &Value, field: &'static str) -> Result<Option<String>, MapError> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => required_str(raw, field).map(Some),
    }
}

pub(crate) fn optional_float(raw: &Value, field: &'static str) -> Result<Option<f64>, MapError> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => required_float(raw, field).map(Some),
    }
}

pub(crate) fn optional_flag(raw: &Value, field: &'static str) -> Result<Option<bool>, MapError> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => required_flag(raw, field).map(Some),
    }
}

/// The `{"key": [records...]}` envelope every list endpoint uses.
pub(crate) fn record_array<'a>(
    raw: &'a Value,
    field: &'static str,
) -> Result<&'a Vec<Value>, MapError> {
    raw.get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| MapError::UnexpectedShape {
            reason: format!("expected an array under `{field}`"),
            raw: raw.clone(),
        })
}

fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn float_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        _ => int_value(value).map(|n| n != 0),
    }
}

fn missing(raw: &Value, field: &'static str) -> MapError {
    MapError::MissingField {
        field,
        raw: raw.clone(),
    }
}

fn malformed(raw: &Value, field: &'static str, reason: String) -> MapError {
    MapError::MalformedField {
        field,
        reason,
        raw: raw.clone(),
    }
}
