//! Exercise entity
//!
//! Dates are stored as `YYYY-MM-DD` strings, which order correctly
//! under plain string comparison, and rendered on the wire in the fixed
//! calendar form `"%a %b %d %Y"` (e.g. `Sun Jan 15 2023`).

use chrono::NaiveDate;
use serde_json::{json, Value};

use super::errors::{ValidationError, ValidationResult};

/// Maximum accepted description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 100;

/// Smallest accepted duration, in minutes.
pub const MIN_DURATION_MINUTES: i64 = 1;

/// Storage format for exercise dates.
pub const DATE_STORAGE_FORMAT: &str = "%Y-%m-%d";

/// Wire format: weekday abbrev, month abbrev, zero-padded day, year.
pub const DATE_WIRE_FORMAT: &str = "%a %b %d %Y";

/// A stored exercise entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
}

impl Exercise {
    /// Store collection holding exercise documents.
    pub const COLLECTION: &'static str = "exercises";

    /// Rebuilds an exercise from its stored document.
    pub fn from_document(document: &Value) -> Option<Self> {
        let date_raw = document.get("date")?.as_str()?;
        Some(Self {
            id: document.get("_id")?.as_str()?.to_string(),
            user_id: document.get("userId")?.as_str()?.to_string(),
            description: document.get("description")?.as_str()?.to_string(),
            duration: document.get("duration")?.as_i64()?,
            date: NaiveDate::parse_from_str(date_raw, DATE_STORAGE_FORMAT).ok()?,
        })
    }

    /// Fixed-format calendar rendering used in every response.
    pub fn log_date(&self) -> String {
        format_log_date(self.date)
    }
}

/// Renders a date in the fixed wire format.
pub fn format_log_date(date: NaiveDate) -> String {
    date.format(DATE_WIRE_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` calendar date. `None` when absent, blank, or
/// unparseable.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_STORAGE_FORMAT).ok()
}

/// A validated, not-yet-stored exercise entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
}

impl NewExercise {
    /// Validates raw body fields.
    ///
    /// `duration` must parse to an integer of at least
    /// [`MIN_DURATION_MINUTES`]. A missing or unparseable `date` falls
    /// back to `today`; that fallback is part of the data model, not an
    /// error.
    pub fn parse(
        description: Option<&str>,
        duration: Option<&str>,
        date: Option<&str>,
        today: NaiveDate,
    ) -> ValidationResult<Self> {
        let description = description.unwrap_or("").trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(ValidationError::DescriptionTooLong(DESCRIPTION_MAX_CHARS));
        }

        let duration = duration
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or(ValidationError::InvalidDuration)?
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidDuration)?;
        if duration < MIN_DURATION_MINUTES {
            return Err(ValidationError::DurationTooSmall);
        }

        Ok(Self {
            description: description.to_string(),
            duration,
            date: parse_date(date).unwrap_or(today),
        })
    }

    /// Document body handed to the store, linked to its owner.
    pub fn to_document(&self, user_id: &str) -> Value {
        json!({
            "userId": user_id,
            "description": self.description,
            "duration": self.duration,
            "date": self.date.format(DATE_STORAGE_FORMAT).to_string(),
        })
    }
}
