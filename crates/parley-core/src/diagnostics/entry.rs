use std::fmt::{self, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::Level;

/// Substituted for an argument whose structured form cannot be produced.
pub const OPAQUE_PLACEHOLDER: &str = "[Object]";

/// Severity of a recorded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Informational output.
    Info,
    /// Something unexpected but recoverable.
    Warn,
    /// A failure.
    Error,
}

impl LogLevel {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parses `info`, `warn`/`warning` or `error`, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Maps the three intercepted tracing levels; DEBUG and TRACE are not
    /// recorded.
    pub(crate) fn from_tracing(level: &Level) -> Option<Self> {
        match *level {
            Level::INFO => Some(Self::Info),
            Level::WARN => Some(Self::Warn),
            Level::ERROR => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the line was recorded.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: LogLevel,
    /// Flattened display string.
    pub message: String,
}

impl LogEntry {
    /// `[<RFC 3339 timestamp>] [<LEVEL>] <message>`.
    pub fn export_line(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.level.as_str().to_ascii_uppercase(),
            self.message
        )
    }
}

/// One argument of a log call, already reduced to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogArg {
    /// A primitive value, stringified directly.
    Primitive(String),
    /// An object-shaped value in structured text form.
    Structured(String),
    /// An object whose structured form could not be produced.
    Opaque,
}

impl LogArg {
    /// Primitive argument from anything displayable. A failing `Display`
    /// impl yields [`LogArg::Opaque`].
    pub fn text(value: impl fmt::Display) -> Self {
        let mut out = String::new();
        match write!(out, "{}", value) {
            Ok(()) => Self::Primitive(out),
            Err(_) => Self::Opaque,
        }
    }

    /// Structured argument serialized as pretty JSON. Serialization failure
    /// yields [`LogArg::Opaque`].
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(json) => Self::Structured(json),
            Err(_) => Self::Opaque,
        }
    }

    /// Structured argument from a `Debug` impl, pretty-printed.
    pub fn debug(value: &dyn fmt::Debug) -> Self {
        let mut out = String::new();
        match write!(out, "{:#?}", value) {
            Ok(()) => Self::Structured(out),
            Err(_) => Self::Opaque,
        }
    }

    fn as_text(&self) -> &str {
        match self {
            Self::Primitive(text) | Self::Structured(text) => text,
            Self::Opaque => OPAQUE_PLACEHOLDER,
        }
    }
}

impl From<&str> for LogArg {
    fn from(value: &str) -> Self {
        Self::Primitive(value.to_string())
    }
}

impl From<String> for LogArg {
    fn from(value: String) -> Self {
        Self::Primitive(value)
    }
}

impl From<bool> for LogArg {
    fn from(value: bool) -> Self {
        Self::Primitive(value.to_string())
    }
}

impl From<i64> for LogArg {
    fn from(value: i64) -> Self {
        Self::Primitive(value.to_string())
    }
}

impl From<u64> for LogArg {
    fn from(value: u64) -> Self {
        Self::Primitive(value.to_string())
    }
}

impl From<f64> for LogArg {
    fn from(value: f64) -> Self {
        Self::Primitive(value.to_string())
    }
}

/// Joins arguments with single spaces into the entry's display string.
pub fn flatten_args(args: &[LogArg]) -> String {
    args.iter().map(LogArg::as_text).collect::<Vec<_>>().join(" ")
}
