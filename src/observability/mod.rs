//! Observability for fitlog
//!
//! Structured JSON logging only: one line per event, synchronous,
//! deterministic key ordering. Warnings and errors go to stderr so a
//! supervisor can split the streams.

mod logger;

pub use logger::{Logger, Severity};
