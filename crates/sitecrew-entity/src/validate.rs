//! Field-level validation helpers shared by the entity models.

use chrono::{NaiveDate, NaiveTime};

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;

/// Calendar date format used on disk and on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Clock time format used on disk and on the wire.
pub const TIME_FORMAT: &str = "%H:%M";

/// Reject blank values.
pub fn require(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required"))
            .with_details(serde_json::json!({ "field": field })));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        AppError::validation(format!("{field} must be a date in YYYY-MM-DD format"))
            .with_details(serde_json::json!({ "field": field }))
    })
}

/// Parse an `HH:MM` clock time.
pub fn parse_time(value: &str, field: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| {
        AppError::validation(format!("{field} must be a time in HH:MM format"))
            .with_details(serde_json::json!({ "field": field }))
    })
}

/// Trim a string in place.
pub fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}
