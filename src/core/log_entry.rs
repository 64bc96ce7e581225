//! Log entry structure

use super::fields::Fields;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::panic::Location;

/// One record awaiting rendering
///
/// Built on the caller's thread and never modified afterwards; the worker
/// only reads it.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub fields: Fields,
    pub timestamp: DateTime<Utc>,
    pub caller: Option<&'static Location<'static>>,
}

/// Sanitize user text to prevent log injection attacks
///
/// Replaces newlines, carriage returns, and tabs with escape sequences
/// so neither a message nor a field can forge additional records.
pub(crate) fn sanitize(text: &str) -> String {
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl AsRef<str>, fields: Fields) -> Self {
        Self {
            level,
            message: sanitize(message.as_ref()),
            fields,
            timestamp: Utc::now(),
            caller: None,
        }
    }

    #[must_use]
    pub fn with_caller(mut self, caller: &'static Location<'static>) -> Self {
        self.caller = Some(caller);
        self
    }

    /// `file:line` of the originating call site
    pub fn caller_string(&self) -> Option<String> {
        self.caller
            .map(|location| format!("{}:{}", location.file(), location.line()))
    }
}
