//! Structured JSON logger
//!
//! - One log line = one event
//! - Deterministic key ordering: `event`, `level`, `ts`, then fields
//!   alphabetically
//! - Synchronous, unbuffered writes
//! - Info goes to stdout; warnings and errors to stderr

use std::fmt;
use std::io::{self, Write};

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operations
    Info,
    /// Recoverable issues (a dropped query bound, a refused request)
    Warn,
    /// Operation failures
    Error,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that writes one JSON object per event.
pub struct Logger;

impl Logger {
    /// Log a normal operational event to stdout.
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::emit(Severity::Info, event, fields, &mut io::stdout());
    }

    /// Log a recoverable issue to stderr.
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::emit(Severity::Warn, event, fields, &mut io::stderr());
    }

    /// Log an operation failure to stderr.
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::emit(Severity::Error, event, fields, &mut io::stderr());
    }

    fn emit<W: Write>(severity: Severity, event: &str, fields: &[(&str, &str)], writer: &mut W) {
        let ts = chrono::Utc::now().to_rfc3339();
        Self::write_line(severity, event, fields, &ts, writer);
    }

    /// Formats and writes one log line. Split out so tests can pin the
    /// timestamp and capture the output.
    fn write_line<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        ts: &str,
        writer: &mut W,
    ) {
        let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);

        let mut line = String::with_capacity(128);
        line.push('{');
        push_pair(&mut line, "event", event);
        line.push(',');
        push_pair(&mut line, "level", severity.as_str());
        line.push(',');
        push_pair(&mut line, "ts", ts);
        for (key, value) in sorted {
            line.push(',');
            push_pair(&mut line, key, value);
        }
        line.push_str("}\n");

        // A failed log write must not fail the operation being logged.
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

fn push_pair(buf: &mut String, key: &str, value: &str) {
    buf.push('"');
    escape_into(buf, key);
    buf.push_str("\":\"");
    escape_into(buf, value);
    buf.push('"');
}

fn escape_into(buf: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                buf.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => buf.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut out = Vec::new();
        Logger::write_line(severity, event, fields, "2024-01-01T00:00:00+00:00", &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_event_and_level_lead_the_line() {
        let line = capture(Severity::Info, "SERVER_STARTED", &[("addr", "0.0.0.0:3000")]);
        assert!(line.starts_with(r#"{"event":"SERVER_STARTED","level":"INFO","#));
        assert!(line.ends_with("}\n"));
    }

    #[test]
    fn test_fields_sorted_alphabetically() {
        let line = capture(
            Severity::Warn,
            "LOG_BOUND_DROPPED",
            &[("value", "not-a-date"), ("bound", "from")],
        );
        let bound_pos = line.find(r#""bound""#).unwrap();
        let value_pos = line.find(r#""value""#).unwrap();
        assert!(bound_pos < value_pos);
    }

    #[test]
    fn test_deterministic_output() {
        let fields = [("a", "1"), ("b", "2")];
        let first = capture(Severity::Error, "REQUEST_FAILED", &fields);
        let second = capture(Severity::Error, "REQUEST_FAILED", &fields);
        assert_eq!(first, second);
    }

    #[test]
    fn test_values_are_escaped() {
        let line = capture(Severity::Info, "USER_CREATED", &[("username", "a\"b\\c\nd")]);
        assert!(line.contains(r#"a\"b\\c\nd"#));
        assert!(serde_json::from_str::<serde_json::Value>(line.trim()).is_ok());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Info.to_string(), "INFO");
        assert_eq!(Severity::Warn.as_str(), "WARN");
        assert_eq!(Severity::Error.as_str(), "ERROR");
    }
}
