//! Logger configuration
//!
//! `LoggerState` is the mutable configuration of one logger view, guarded by
//! a single `RwLock`. `LoggerConfig` is its plain-data, deserializable form.

use super::error::Result;
use super::fields::Fields;
use super::log_level::LogLevel;
use super::output_format::OutputFormat;
use super::queue::DEFAULT_QUEUE_CAPACITY;
use super::sink::Sink;
use super::timestamp::TimestampFormat;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub(crate) type SharedState = Arc<RwLock<LoggerState>>;

/// Mutable configuration read by the worker at render time
#[derive(Debug, Clone)]
pub(crate) struct LoggerState {
    pub level: LogLevel,
    pub sinks: Vec<Arc<Sink>>,
    pub time_format: TimestampFormat,
    pub format: OutputFormat,
    pub include_caller: bool,
    /// Replaced wholesale on change, so snapshots stay cheap
    pub fields: Arc<Fields>,
}

impl LoggerState {
    pub fn into_shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}

/// Deserializable logger settings
///
/// Sinks are not data and are attached through [`LoggerBuilder`](crate::LoggerBuilder).
///
/// # Example
///
/// ```
/// use bayaan::{LogLevel, LoggerConfig, OutputFormat};
///
/// let config = LoggerConfig::from_json(r#"{
///     "level": "warn",
///     "format": "json",
///     "queue_capacity": 64,
///     "fields": { "service": "billing" }
/// }"#).unwrap();
///
/// assert_eq!(config.level, LogLevel::Warn);
/// assert_eq!(config.format, OutputFormat::Json);
/// assert!(config.include_caller);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub time_format: TimestampFormat,
    pub format: OutputFormat,
    pub queue_capacity: usize,
    pub include_caller: bool,
    pub fields: Fields,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            time_format: TimestampFormat::default(),
            format: OutputFormat::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            include_caller: true,
            fields: Fields::new(),
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
