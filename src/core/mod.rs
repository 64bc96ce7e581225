//! Core logger types: levels, fields, entries, sinks, the queue and worker,
//! and the `Logger` facade

pub mod config;
pub mod error;
pub mod fields;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod queue;
pub mod sink;
pub mod timestamp;
mod worker;

pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use fields::{FieldValue, Fields};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use output_format::{OutputFormat, SYSTEM_FIELDS};
pub use queue::{Enqueue, OverflowCallback, DEFAULT_QUEUE_CAPACITY};
pub use sink::Sink;
pub use timestamp::TimestampFormat;
