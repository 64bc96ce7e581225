//! Timestamp formatting for the `timestamp` system field

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the `timestamp` field of a rendered record is written
///
/// # Examples
///
/// ```
/// use bayaan::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// assert!(format.format(&Utc::now()).ends_with('Z'));
///
/// // Any strftime pattern becomes a custom format
/// let format = TimestampFormat::from("%Y-%m-%d %H:%M:%S");
/// assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d %H:%M:%S".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Seconds since the Unix epoch
    Unix,

    /// Milliseconds since the Unix epoch
    UnixMillis,

    /// strftime-compatible pattern
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(pattern) => {
                use std::fmt::Write;
                // chrono reports bad specifiers through fmt::Error instead of panicking
                let mut out = String::new();
                match write!(out, "{}", datetime.format(pattern)) {
                    Ok(()) => out,
                    Err(_) => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
                }
            }
        }
    }

    /// JSON form: numeric for Unix formats, string otherwise
    pub fn to_json_value(&self, datetime: &DateTime<Utc>) -> serde_json::Value {
        match self {
            TimestampFormat::Unix => serde_json::Value::from(datetime.timestamp()),
            TimestampFormat::UnixMillis => serde_json::Value::from(datetime.timestamp_millis()),
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }
}

impl From<&str> for TimestampFormat {
    fn from(pattern: &str) -> Self {
        TimestampFormat::Custom(pattern.to_string())
    }
}

impl From<String> for TimestampFormat {
    fn from(pattern: String) -> Self {
        TimestampFormat::Custom(pattern)
    }
}
