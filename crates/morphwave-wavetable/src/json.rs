//! Field accessors for `serde_json::Value` state objects.

use crate::error::{Result, StateError};
use serde_json::Value;

pub(crate) fn field<'a>(value: &'a Value, name: &str) -> Result<&'a Value> {
    value.get(name).ok_or_else(|| StateError::missing(name))
}

pub(crate) fn f32_field(value: &Value, name: &str) -> Result<f32> {
    field(value, name)?
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| StateError::wrong_type(name, "a number"))
}

pub(crate) fn f32_or(value: &Value, name: &str, default: f32) -> f32 {
    value
        .get(name)
        .and_then(Value::as_f64)
        .map_or(default, |v| v as f32)
}

pub(crate) fn i32_field(value: &Value, name: &str) -> Result<i32> {
    let raw = field(value, name)?;
    raw.as_i64()
        .or_else(|| raw.as_f64().map(|v| v as i64))
        .map(|v| v as i32)
        .ok_or_else(|| StateError::wrong_type(name, "an integer"))
}

pub(crate) fn i32_or(value: &Value, name: &str, default: i32) -> i32 {
    i32_field(value, name).unwrap_or(default)
}

pub(crate) fn bool_or(value: &Value, name: &str, default: bool) -> bool {
    match value.get(name) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => default,
    }
}

pub(crate) fn str_field<'a>(value: &'a Value, name: &str) -> Result<&'a str> {
    field(value, name)?
        .as_str()
        .ok_or_else(|| StateError::wrong_type(name, "a string"))
}

pub(crate) fn array_field<'a>(value: &'a Value, name: &str) -> Result<&'a Vec<Value>> {
    field(value, name)?
        .as_array()
        .ok_or_else(|| StateError::wrong_type(name, "an array"))
}

pub(crate) fn f32_array(value: &Value, name: &str) -> Result<Vec<f32>> {
    array_field(value, name)?
        .iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| StateError::wrong_type(name, "an array of numbers"))
        })
        .collect()
}
