//! # Response Shapes
//!
//! The exact wire formats. Dates are pre-rendered to the fixed calendar
//! string here so the store's representation never leaks to clients.

use serde::Serialize;

use crate::entities::{Exercise, User};

/// `{username, id}` — create-user and list-users shape.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserResponse {
    pub username: String,
    pub id: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            id: user.id.clone(),
        }
    }
}

/// Add-exercise response: the owning user's id and username plus the
/// new entry, date in fixed calendar form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExerciseResponse {
    pub id: String,
    pub username: String,
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl ExerciseResponse {
    pub fn new(user: &User, exercise: &Exercise) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            description: exercise.description.clone(),
            duration: exercise.duration,
            date: exercise.log_date(),
        }
    }
}

/// One entry of the `log` array.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LogEntry {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl From<&Exercise> for LogEntry {
    fn from(exercise: &Exercise) -> Self {
        Self {
            description: exercise.description.clone(),
            duration: exercise.duration,
            date: exercise.log_date(),
        }
    }
}

/// `{username, count, id, log}` — `count` is the number of entries
/// actually returned, after any limit.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LogResponse {
    pub username: String,
    pub count: usize,
    pub id: String,
    pub log: Vec<LogEntry>,
}

impl LogResponse {
    pub fn new(user: &User, log: Vec<LogEntry>) -> Self {
        Self {
            username: user.username.clone(),
            count: log.len(),
            id: user.id.clone(),
            log,
        }
    }
}
