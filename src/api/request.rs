//! # Request Parsing
//!
//! Raw wire bodies and query parameters, and their conversion into
//! validated request types. Body validation is strict; log query
//! parameters are lenient by contract: a `from`/`to`/`limit` value that
//! does not parse is dropped (with a warning logged) rather than
//! failing the request.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::entities::{parse_date, NewExercise, NewUser, ValidationResult};
use crate::observability::Logger;

/// POST /api/users body (json or form).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserBody {
    #[serde(default)]
    pub username: Option<String>,
}

impl UserBody {
    pub fn validate(&self) -> ValidationResult<NewUser> {
        NewUser::parse(self.username.as_deref())
    }
}

/// A body field that may arrive as a JSON number or as text. Form
/// fields are always text; JSON clients send either.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrText {
    fn to_text(&self) -> String {
        match self {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(t) => t.clone(),
        }
    }
}

/// POST /api/users/:id/exercises body (json or form).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseBody {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<NumberOrText>,
    #[serde(default)]
    pub date: Option<String>,
}

impl ExerciseBody {
    /// Validates into a `NewExercise`; `today` anchors the date default.
    pub fn validate(&self, today: NaiveDate) -> ValidationResult<NewExercise> {
        let duration = self.duration.as_ref().map(NumberOrText::to_text);
        NewExercise::parse(
            self.description.as_deref(),
            duration.as_deref(),
            self.date.as_deref(),
            today,
        )
    }
}

/// GET /api/users/:id/logs query parameters, as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogParams {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// A validated log query. Bounds that did not parse are already gone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl LogParams {
    /// Lenient conversion: each bound is kept only if it parses, and a
    /// dropped bound is logged so the leniency stays observable.
    pub fn into_query(self) -> LogQuery {
        LogQuery {
            from: bound("from", self.from.as_deref()),
            to: bound("to", self.to.as_deref()),
            limit: limit(self.limit.as_deref()),
        }
    }
}

fn bound(name: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match parse_date(Some(raw)) {
        Some(date) => Some(date),
        None => {
            Logger::warn("LOG_BOUND_DROPPED", &[("bound", name), ("value", raw)]);
            None
        }
    }
}

fn limit(raw: Option<&str>) -> Option<usize> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Some(n as usize),
        _ => {
            Logger::warn("LOG_LIMIT_DROPPED", &[("limit", raw)]);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ValidationError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_user_body_from_json() {
        let body: UserBody = serde_json::from_str(r#"{"username": " fcc_test "}"#).unwrap();
        assert_eq!(body.validate().unwrap().username, "fcc_test");
    }

    #[test]
    fn test_user_body_missing_field() {
        let body: UserBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.validate(), Err(ValidationError::EmptyUsername));
    }

    #[test]
    fn test_exercise_duration_as_number_or_text() {
        let body: ExerciseBody =
            serde_json::from_str(r#"{"description": "run", "duration": 30}"#).unwrap();
        assert_eq!(body.validate(today()).unwrap().duration, 30);

        let body: ExerciseBody =
            serde_json::from_str(r#"{"description": "run", "duration": "30"}"#).unwrap();
        assert_eq!(body.validate(today()).unwrap().duration, 30);
    }

    #[test]
    fn test_exercise_fractional_duration_rejected() {
        let body: ExerciseBody =
            serde_json::from_str(r#"{"description": "run", "duration": 30.5}"#).unwrap();
        assert_eq!(body.validate(today()), Err(ValidationError::InvalidDuration));
    }

    #[test]
    fn test_log_params_parse_bounds() {
        let params = LogParams {
            from: Some("2023-01-01".to_string()),
            to: Some("2023-12-31".to_string()),
            limit: Some("5".to_string()),
        };
        let query = params.into_query();
        assert_eq!(query.from, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(query.to, NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn test_malformed_bounds_are_dropped_not_errors() {
        let params = LogParams {
            from: Some("first of may".to_string()),
            to: Some("2023-12-31".to_string()),
            limit: Some("many".to_string()),
        };
        let query = params.into_query();
        assert_eq!(query.from, None);
        assert_eq!(query.to, NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(query.limit, None);
    }

    #[test]
    fn test_non_positive_limit_dropped() {
        for raw in ["0", "-3"] {
            let params = LogParams {
                limit: Some(raw.to_string()),
                ..LogParams::default()
            };
            assert_eq!(params.into_query().limit, None, "raw: {}", raw);
        }
    }

    #[test]
    fn test_absent_params_mean_no_bounds() {
        let query = LogParams::default().into_query();
        assert_eq!(query, LogQuery::default());
    }
}
