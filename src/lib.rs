//! # Bayaan
//!
//! Asynchronous structured logging. Callers submit leveled entries with
//! key/value fields from any thread; one background worker per queue
//! renders them and writes them to every configured sink.
//!
//! ## Guarantees
//!
//! - **Non-blocking submission**: a full queue drops the entry with a
//!   one-line warning on stderr instead of blocking the caller
//! - **Bounded memory**: the queue has a fixed capacity (1000 by default)
//! - **FIFO rendering**: accepted entries are written in submission order
//! - **Drain on close**: `close()` returns only after every accepted entry
//!   reached every sink
//!
//! ```
//! use bayaan::prelude::*;
//!
//! let buffer = MemoryWriter::new();
//! let logger = Logger::builder()
//!     .level(LogLevel::Debug)
//!     .output(Sink::new(buffer.clone(), false), false)
//!     .field("service", "billing")
//!     .build()
//!     .unwrap();
//!
//! let request = logger.with([("request_id", "r-17")]);
//! request.info("charge accepted", [("amount", 1299)]);
//! logger.close().unwrap();
//!
//! assert!(buffer.contents().contains("request_id: r-17"));
//! ```

pub mod core;
pub mod env;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Enqueue, FieldValue, Fields, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, OutputFormat, Result, Sink, TimestampFormat,
    };
    pub use crate::sinks::MemoryWriter;
}

pub use self::core::{
    Enqueue, FieldValue, Fields, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, OutputFormat, OverflowCallback, Result, Sink, TimestampFormat,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT, SYSTEM_FIELDS,
};
pub use sinks::MemoryWriter;
