//! Validation errors for entity construction

use thiserror::Error;

/// Result type for entity validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Input that fails these checks never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username is required")]
    EmptyUsername,

    #[error("username exceeds {0} characters")]
    UsernameTooLong(usize),

    #[error("description is required")]
    EmptyDescription,

    #[error("description exceeds {0} characters")]
    DescriptionTooLong(usize),

    #[error("duration must be an integer number of minutes")]
    InvalidDuration,

    #[error("duration must be at least 1 minute")]
    DurationTooSmall,
}
