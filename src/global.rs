//! Process-wide default logger
//!
//! The facade owns at most one [`Logger`]. It is created by [`setup`], or
//! lazily with default settings on first use. Every call clones the current
//! handle under a read lock and logs outside it, so a concurrent `setup`
//! can never expose a half-built logger. A call racing with a replacement
//! may land on the old logger after it closed, in which case it returns
//! [`Enqueue::Closed`].
//!
//! ```no_run
//! use bayaan::{global, Fields, LogLevel, Logger};
//!
//! global::setup(Logger::builder().level(LogLevel::Debug)).unwrap();
//! global::info("service started", [("port", 8080)]);
//! global::close().unwrap();
//! ```

use crate::core::{Enqueue, Fields, LogLevel, Logger, LoggerBuilder, LoggerError, Result};
use parking_lot::{const_rwlock, RwLock};
use std::mem;

enum Slot {
    Uninit,
    Active(Logger),
    Closed,
}

static GLOBAL: RwLock<Slot> = const_rwlock(Slot::Uninit);

/// Build a logger from `builder` and install it, closing the previous one.
///
/// The previous logger is drained after the swap, outside the lock.
pub fn setup(builder: LoggerBuilder) -> Result<()> {
    let logger = builder.build()?;
    install(logger);
    Ok(())
}

/// Install an already-built logger, closing the previous one.
pub fn install(logger: Logger) {
    let previous = mem::replace(&mut *GLOBAL.write(), Slot::Active(logger));
    if let Slot::Active(old) = previous {
        let _ = old.close();
    }
}

/// Handle to the current global logger.
///
/// Creates the default logger on first use. Returns `None` after
/// [`close`] until the next [`setup`].
pub fn logger() -> Option<Logger> {
    {
        let slot = GLOBAL.read();
        match &*slot {
            Slot::Active(logger) => return Some(logger.clone()),
            Slot::Closed => return None,
            Slot::Uninit => {}
        }
    }

    let mut slot = GLOBAL.write();
    match &*slot {
        Slot::Active(logger) => Some(logger.clone()),
        Slot::Closed => None,
        Slot::Uninit => match LoggerBuilder::new().build() {
            Ok(logger) => {
                *slot = Slot::Active(logger.clone());
                Some(logger)
            }
            Err(e) => {
                eprintln!("[bayaan ERROR] Failed to start default logger: {}", e);
                None
            }
        },
    }
}

/// Drain and close the global logger. Later calls are no-ops until the
/// next [`setup`].
pub fn close() -> Result<()> {
    let previous = mem::replace(&mut *GLOBAL.write(), Slot::Closed);
    match previous {
        Slot::Active(logger) => logger.close(),
        Slot::Uninit => Ok(()),
        Slot::Closed => Err(LoggerError::AlreadyClosed),
    }
}

#[track_caller]
pub fn log(level: LogLevel, message: impl AsRef<str>, fields: impl Into<Fields>) -> Enqueue {
    match logger() {
        Some(logger) => logger.log(level, message, fields),
        None => Enqueue::Closed,
    }
}

#[track_caller]
pub fn trace(message: impl AsRef<str>, fields: impl Into<Fields>) -> Enqueue {
    log(LogLevel::Trace, message, fields)
}

#[track_caller]
pub fn debug(message: impl AsRef<str>, fields: impl Into<Fields>) -> Enqueue {
    log(LogLevel::Debug, message, fields)
}

#[track_caller]
pub fn info(message: impl AsRef<str>, fields: impl Into<Fields>) -> Enqueue {
    log(LogLevel::Info, message, fields)
}

#[track_caller]
pub fn warn(message: impl AsRef<str>, fields: impl Into<Fields>) -> Enqueue {
    log(LogLevel::Warn, message, fields)
}

#[track_caller]
pub fn error(message: impl AsRef<str>, fields: impl Into<Fields>) -> LoggerError {
    let message = message.as_ref();
    log(LogLevel::Error, message, fields);
    LoggerError::Logged(message.to_string())
}

/// Log at `Fatal` on the global logger, then exit with status 1.
///
/// The queue is not drained; call [`close`] first when the record must
/// be written.
#[track_caller]
pub fn fatal(message: impl AsRef<str>, fields: impl Into<Fields>) -> ! {
    log(LogLevel::Fatal, message.as_ref(), fields);
    std::process::exit(1)
}

#[track_caller]
pub fn panic(message: impl AsRef<str>, fields: impl Into<Fields>) -> ! {
    let message = message.as_ref();
    log(LogLevel::Panic, message, fields);
    panic!("{}", message)
}

/// Derived logger over the global one; `None` once the facade is closed
pub fn with(fields: impl Into<Fields>) -> Option<Logger> {
    logger().map(|logger| logger.with(fields))
}

pub fn set_level(level: LogLevel) {
    if let Some(logger) = logger() {
        logger.set_level(level);
    }
}

pub fn level() -> Option<LogLevel> {
    logger().map(|logger| logger.level())
}
