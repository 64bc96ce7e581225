//! Logging macros for ergonomic message formatting and field construction.
//!
//! # Examples
//!
//! ```
//! use bayaan::prelude::*;
//! use bayaan::{fields, info, warn};
//!
//! let logger = Logger::builder()
//!     .output(Sink::new(MemoryWriter::new(), false), false)
//!     .build()
//!     .unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! warn!(logger, { "port" => port, "retry" => true }, "Port {} busy", port);
//!
//! let extra = fields! { "user_id" => 42, "action" => "login" };
//! logger.info("User logged in", extra);
//! # logger.close().unwrap();
//! ```

/// Build [`Fields`](crate::Fields) from `key => value` pairs.
///
/// ```
/// use bayaan::{fields, FieldValue};
///
/// let fields = fields! { "code" => 500, "retry" => false };
/// assert_eq!(fields.get("code"), Some(&FieldValue::Int(500)));
/// assert!(fields! {}.is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(fields.insert($key, $value);)+
        fields
    }};
}

/// Log a formatted message at an explicit level, with optional fields.
///
/// ```
/// # use bayaan::prelude::*;
/// # let logger = Logger::builder().output(Sink::new(MemoryWriter::new(), false), false).build().unwrap();
/// use bayaan::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Warn, { "code" => 500 }, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, { $($key:expr => $value:expr),* $(,)? }, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), $crate::fields!($($key => $value),*))
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), $crate::Fields::new())
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warn-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// Unlike [`Logger::error`](crate::Logger::error) this only submits the
/// entry and evaluates to the [`Enqueue`](crate::Enqueue) outcome.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
