use std::str::FromStr;

use crate::error::ApiError;

pub mod accounts;
pub mod contacts;
pub mod dashboard;
pub mod health;
pub mod tasks;
pub mod tickets;

/// A required form field: absent or blank is a validation error.
fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ApiError::Validation { field }),
    }
}

/// An optional text field: absent or blank becomes None.
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// An optional foreign-key field submitted as a string; `""` means unlinked.
fn optional_id(value: Option<String>, field: &'static str) -> Result<Option<i64>, ApiError> {
    match optional(value) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("{field} must be an integer id"))),
    }
}

/// Enum-valued field (state, priority): absent or blank falls back to the
/// entity default; an unrecognized value is rejected at the boundary.
fn enum_or_default<T>(value: Option<String>, field: &'static str) -> Result<T, ApiError>
where
    T: FromStr + Default,
{
    match optional(value) {
        None => Ok(T::default()),
        Some(raw) => T::from_str(raw.trim())
            .map_err(|_| ApiError::BadRequest(format!("{field} has an unknown value: {raw}"))),
    }
}

/// Enum-valued query filter: absent or blank means no filter.
fn enum_filter<T>(value: Option<String>, field: &'static str) -> Result<Option<T>, ApiError>
where
    T: FromStr,
{
    match optional(value) {
        None => Ok(None),
        Some(raw) => T::from_str(raw.trim())
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("{field} has an unknown value: {raw}"))),
    }
}
