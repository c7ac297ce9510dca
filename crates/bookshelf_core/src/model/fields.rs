//! Untyped field-map parsing shared by drafts and patches.
//!
//! Callers hand the core a JSON-like map of string keys to scalar values.
//! The helpers here turn one key into a typed value or a
//! [`ValidationError`]. Optional helpers return `None` when the key is
//! absent and `Some(None)` when the caller explicitly cleared it.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Untyped create/update input.
pub type FieldMap = serde_json::Map<String, Value>;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Malformed or out-of-range input for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Error for ValidationError {}

pub type FieldResult<T> = Result<T, ValidationError>;

/// Reads a string that must be present and non-null.
pub fn required_string(fields: &FieldMap, key: &str) -> FieldResult<String> {
    match fields.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        None | Some(Value::Null) => Err(ValidationError::new(key, "is required")),
        Some(_) => Err(ValidationError::new(key, "must be a string")),
    }
}

/// Reads a string that, when present, must not be null.
pub fn replacement_string(fields: &FieldMap, key: &str) -> FieldResult<Option<String>> {
    match fields.get(key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(Value::Null) => Err(ValidationError::new(key, "must not be null")),
        Some(_) => Err(ValidationError::new(key, "must be a string")),
    }
}

pub fn optional_string(fields: &FieldMap, key: &str) -> FieldResult<Option<Option<String>>> {
    match fields.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(value)) => Ok(Some(Some(value.clone()))),
        Some(_) => Err(ValidationError::new(key, "must be a string or null")),
    }
}

/// Reads an ISO `YYYY-MM-DD` date. Null and the empty string clear it.
pub fn optional_date(fields: &FieldMap, key: &str) -> FieldResult<Option<Option<NaiveDate>>> {
    match fields.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(value)) if value.is_empty() => Ok(Some(None)),
        Some(Value::String(value)) => parse_iso_date(key, value).map(|date| Some(Some(date))),
        Some(_) => Err(ValidationError::new(key, "must be a YYYY-MM-DD string or null")),
    }
}

pub fn optional_number(fields: &FieldMap, key: &str) -> FieldResult<Option<Option<f64>>> {
    match fields.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::Number(value)) => value
            .as_f64()
            .map(|number| Some(Some(number)))
            .ok_or_else(|| ValidationError::new(key, "must be a finite number")),
        Some(_) => Err(ValidationError::new(key, "must be a number or null")),
    }
}

pub fn required_integer(fields: &FieldMap, key: &str) -> FieldResult<i64> {
    match fields.get(key) {
        None | Some(Value::Null) => Err(ValidationError::new(key, "is required")),
        Some(value) => as_integer(key, value),
    }
}

/// Reads an integer that, when present, must not be null.
pub fn replacement_integer(fields: &FieldMap, key: &str) -> FieldResult<Option<i64>> {
    match fields.get(key) {
        None => Ok(None),
        Some(Value::Null) => Err(ValidationError::new(key, "must not be null")),
        Some(value) => as_integer(key, value).map(Some),
    }
}

fn as_integer(key: &str, value: &Value) -> FieldResult<i64> {
    value
        .as_i64()
        .ok_or_else(|| ValidationError::new(key, "must be an integer"))
}

fn parse_iso_date(key: &str, value: &str) -> FieldResult<NaiveDate> {
    if !ISO_DATE_RE.is_match(value) {
        return Err(ValidationError::new(key, "must use YYYY-MM-DD format"));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::new(key, format!("`{value}` is not a calendar date")))
}
