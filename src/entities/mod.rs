//! Entity schemas for fitlog
//!
//! Typed `User` and `Exercise` records, their document conversions, and
//! validated `New*` constructors. Validation happens here, before any
//! store interaction: presence, trimming, length bounds, and the
//! duration/date parsing rules.

mod errors;
mod exercise;
mod user;

pub use errors::{ValidationError, ValidationResult};
pub use exercise::{
    format_log_date, parse_date, Exercise, NewExercise, DATE_STORAGE_FORMAT, DATE_WIRE_FORMAT,
    DESCRIPTION_MAX_CHARS, MIN_DURATION_MINUTES,
};
pub use user::{NewUser, User, USERNAME_MAX_CHARS};
