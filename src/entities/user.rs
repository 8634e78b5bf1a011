//! User entity

use serde_json::{json, Value};

use super::errors::{ValidationError, ValidationResult};

/// Maximum accepted username length, in characters.
pub const USERNAME_MAX_CHARS: usize = 50;

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
}

impl User {
    /// Store collection holding user documents.
    pub const COLLECTION: &'static str = "users";

    /// Rebuilds a user from its stored document. `None` if the document
    /// is missing either field.
    pub fn from_document(document: &Value) -> Option<Self> {
        Some(Self {
            id: document.get("_id")?.as_str()?.to_string(),
            username: document.get("username")?.as_str()?.to_string(),
        })
    }
}

/// A validated, not-yet-stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
}

impl NewUser {
    /// Validates a raw username: trimmed, non-empty, bounded length.
    pub fn parse(raw: Option<&str>) -> ValidationResult<Self> {
        let username = raw.unwrap_or("").trim();
        if username.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX_CHARS {
            return Err(ValidationError::UsernameTooLong(USERNAME_MAX_CHARS));
        }
        Ok(Self {
            username: username.to_string(),
        })
    }

    /// Document body handed to the store (`_id` and `created_at` are
    /// assigned there).
    pub fn to_document(&self) -> Value {
        json!({ "username": self.username })
    }
}
