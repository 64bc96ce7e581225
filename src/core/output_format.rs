//! Rendering of log entries into text records
//!
//! - Text: `LEVEL: message` followed by one `key: value` line per field
//! - Json: one object per line
//! - Logfmt: `key=value` pairs on one line
//!
//! The system fields `timestamp`, `level`, `message` and `caller` always
//! win over user fields of the same name.

use super::error::{LoggerError, Result};
use super::fields::{FieldValue, Fields};
use super::log_entry::{sanitize, LogEntry};
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

pub const SYSTEM_FIELDS: [&str; 4] = ["timestamp", "level", "message", "caller"];

#[inline]
fn is_system_field(key: &str) -> bool {
    SYSTEM_FIELDS.contains(&key)
}

/// Output format for rendered records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Multi-line plain text (default)
    ///
    /// ```text
    /// ERROR: payment failed
    /// time: 2025-01-08T10:30:45.123Z
    /// caller: src/billing.rs:42
    /// code: 500
    /// ```
    #[default]
    Text,

    /// `{"caller":"src/billing.rs:42","code":500,"level":"ERROR","message":"payment failed","timestamp":"..."}`
    Json,

    /// `timestamp=... level=ERROR message="payment failed" caller=src/billing.rs:42 code=500`
    Logfmt,
}

impl OutputFormat {
    /// Render `entry` with its fully merged user `fields`.
    ///
    /// The returned record always ends with a newline.
    pub fn render(
        &self,
        entry: &LogEntry,
        fields: &Fields,
        timestamp_format: &TimestampFormat,
        include_caller: bool,
    ) -> Result<String> {
        let caller = if include_caller {
            entry.caller_string()
        } else {
            None
        };
        match self {
            OutputFormat::Text => Ok(self.render_text(entry, fields, timestamp_format, caller)),
            OutputFormat::Json => self.render_json(entry, fields, timestamp_format, caller),
            OutputFormat::Logfmt => Ok(self.render_logfmt(entry, fields, timestamp_format, caller)),
        }
    }

    /// Stand-in record used when `render` fails
    pub fn placeholder(entry: &LogEntry, error: &LoggerError) -> String {
        format!(
            "{}: <bayaan: failed to render entry: {}>\n",
            entry.level.to_str(),
            sanitize(&error.to_string())
        )
    }

    fn render_text(
        &self,
        entry: &LogEntry,
        fields: &Fields,
        timestamp_format: &TimestampFormat,
        caller: Option<String>,
    ) -> String {
        let mut out = format!("{}: {}\n", entry.level.to_str(), entry.message);
        out.push_str(&format!("time: {}\n", timestamp_format.format(&entry.timestamp)));
        if let Some(caller) = caller {
            out.push_str(&format!("caller: {}\n", caller));
        }
        for (key, value) in fields.sorted() {
            if is_system_field(key) {
                continue;
            }
            out.push_str(&format!("{}: {}\n", sanitize(key), sanitize(&value.to_string())));
        }
        out
    }

    fn render_json(
        &self,
        entry: &LogEntry,
        fields: &Fields,
        timestamp_format: &TimestampFormat,
        caller: Option<String>,
    ) -> Result<String> {
        let mut json_obj = serde_json::Map::new();

        for (key, value) in fields.iter() {
            let value = value.to_json_value().ok_or_else(|| {
                LoggerError::formatter("JSON", format!("non-finite float in field '{}'", key))
            })?;
            json_obj.insert(key.clone(), value);
        }

        // System fields last so they overwrite colliding user keys
        json_obj.insert(
            "timestamp".to_string(),
            timestamp_format.to_json_value(&entry.timestamp),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );
        match caller {
            Some(caller) => {
                json_obj.insert("caller".to_string(), serde_json::Value::String(caller));
            }
            None => {
                json_obj.remove("caller");
            }
        }

        let mut line = serde_json::to_string(&serde_json::Value::Object(json_obj))?;
        line.push('\n');
        Ok(line)
    }

    fn render_logfmt(
        &self,
        entry: &LogEntry,
        fields: &Fields,
        timestamp_format: &TimestampFormat,
        caller: Option<String>,
    ) -> String {
        let mut parts = vec![
            format!(
                "timestamp={}",
                escape_logfmt_value(&timestamp_format.format(&entry.timestamp))
            ),
            format!("level={}", entry.level.to_str()),
            format!("message={}", quote_logfmt_value(&entry.message)),
        ];
        if let Some(caller) = caller {
            parts.push(format!("caller={}", escape_logfmt_value(&caller)));
        }

        for (key, value) in fields.sorted() {
            if is_system_field(key) {
                continue;
            }
            let formatted = match value {
                FieldValue::String(s) => escape_logfmt_value(s),
                other => escape_logfmt_value(&other.to_string()),
            };
            parts.push(format!("{}={}", escape_logfmt_key(key), formatted));
        }

        let mut line = parts.join(" ");
        line.push('\n');
        line
    }
}

/// Keep only characters that are safe in a logfmt key
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
        .collect()
}

/// Quote a logfmt value only if it needs it
fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '"', '=']) || value.contains(char::is_control) {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", sanitize(&escaped))
}
