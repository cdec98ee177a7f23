//! Helpers shared by the form-handling routes.

use chrono::{NaiveDate, NaiveTime};
use common::FieldErrors;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::{Value, json};

/// `{ value, label }` pair for a select input.
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }
}

pub const REQUIRED: &str = "This field is required.";

/// Context for a form page: the submitted values, their errors and any extras.
pub fn form_context<F: Serialize>(form: &F, errors: &FieldErrors, extra: Value) -> Value {
    let mut context = json!({ "form": form, "errors": errors });
    if let (Some(target), Value::Object(extra)) = (context.as_object_mut(), extra) {
        target.extend(extra);
    }
    context
}

/// Parses an `<input type="date">` value.
pub fn parse_date(raw: &str, field: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Enter a valid date.");
            None
        }
    }
}

/// Parses an optional `<input type="time">` value, with or without seconds.
pub fn parse_optional_time(raw: &str, field: &str, errors: &mut FieldErrors) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
    {
        Ok(time) => Some(time),
        Err(_) => {
            errors.add(field, "Enter a valid time.");
            None
        }
    }
}

pub fn parse_int(raw: &str, field: &str, errors: &mut FieldErrors) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match raw.parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, "Enter a whole number.");
            None
        }
    }
}

pub fn parse_id(raw: &str, field: &str, errors: &mut FieldErrors) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match raw.parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, "Select a valid choice.");
            None
        }
    }
}

/// HTML checkboxes send a value only when ticked.
pub fn checkbox(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("on" | "true" | "1" | "yes")
    )
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
