//! Logger facade
//!
//! A `Logger` is a cheap handle: clones share everything, while
//! [`Logger::with`] creates a derived logger that shares the queue, worker
//! and lifecycle but owns an independent copy of the configuration.

use super::{
    config::{LoggerConfig, LoggerState, SharedState},
    error::{LoggerError, Result},
    fields::{FieldValue, Fields},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    queue::{Enqueue, EntryQueue, OverflowCallback, Queued, DEFAULT_QUEUE_CAPACITY},
    sink::Sink,
    timestamp::TimestampFormat,
    worker,
};
use parking_lot::Mutex;
use std::panic::Location;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default time to wait for the worker to drain when the last handle is
/// dropped without an explicit `close()`.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Queue, worker and metrics shared by a logger and every view derived from it
struct Pipeline {
    queue: EntryQueue,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    metrics: Arc<LoggerMetrics>,
}

impl Pipeline {
    /// Wait for a worker that has been told to stop. Gives the handle back
    /// if it is still running when `timeout` expires.
    fn wait(
        handle: thread::JoinHandle<()>,
        timeout: Option<Duration>,
    ) -> std::result::Result<(), thread::JoinHandle<()>> {
        if let Some(timeout) = timeout {
            let start = Instant::now();
            while !handle.is_finished() {
                if start.elapsed() >= timeout {
                    return Err(handle);
                }
                thread::sleep(Duration::from_millis(10));
            }
        }

        if handle.join().is_err() {
            eprintln!("[bayaan ERROR] Log worker panicked; remaining entries were lost");
        }
        Ok(())
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.queue.close();

        if let Some(handle) = self.worker.get_mut().take() {
            if Self::wait(handle, Some(DEFAULT_SHUTDOWN_TIMEOUT)).is_err() {
                eprintln!(
                    "[bayaan WARNING] Log worker did not finish within {:?}. \
                     Some entries may be lost.",
                    DEFAULT_SHUTDOWN_TIMEOUT
                );
            }
        }

        let dropped = self.metrics.dropped();
        if dropped > 0 {
            eprintln!(
                "[bayaan WARNING] Logger shutting down with {} dropped entries (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Asynchronous structured logger
///
/// # Example
///
/// ```
/// use bayaan::prelude::*;
///
/// let buffer = MemoryWriter::new();
/// let logger = Logger::builder()
///     .level(LogLevel::Warn)
///     .output(Sink::new(buffer.clone(), false), false)
///     .build()
///     .unwrap();
///
/// logger.info("hidden", Fields::new());
/// let _ = logger.error("shown", [("code", 500)]);
/// logger.close().unwrap();
///
/// let out = buffer.contents();
/// assert!(out.contains("ERROR: shown"));
/// assert!(out.contains("code: 500"));
/// assert!(!out.contains("hidden"));
/// ```
#[derive(Clone)]
pub struct Logger {
    state: SharedState,
    pipeline: Arc<Pipeline>,
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Submit an entry at any level.
    ///
    /// Never blocks. Level filtering happens later, in the worker, against
    /// the level in force when the entry is rendered. Unlike [`fatal`] and
    /// [`panic`], this never terminates, whatever the level.
    ///
    /// [`fatal`]: Logger::fatal
    /// [`panic`]: Logger::panic
    #[track_caller]
    pub fn log(
        &self,
        level: LogLevel,
        message: impl AsRef<str>,
        fields: impl Into<Fields>,
    ) -> Enqueue {
        let entry = LogEntry::new(level, message, fields.into()).with_caller(Location::caller());
        self.pipeline.queue.enqueue(Queued {
            entry,
            state: Arc::clone(&self.state),
        })
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl AsRef<str>, fields: impl Into<Fields>) -> Enqueue {
        self.log(LogLevel::Trace, message, fields)
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>, fields: impl Into<Fields>) -> Enqueue {
        self.log(LogLevel::Debug, message, fields)
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>, fields: impl Into<Fields>) -> Enqueue {
        self.log(LogLevel::Info, message, fields)
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>, fields: impl Into<Fields>) -> Enqueue {
        self.log(LogLevel::Warn, message, fields)
    }

    /// Log at `Error` and hand back an error carrying the message, for
    /// call sites that log and then propagate.
    ///
    /// ```
    /// # use bayaan::prelude::*;
    /// fn charge(logger: &Logger) -> bayaan::Result<()> {
    ///     Err(logger.error("card declined", [("code", 402)]))
    /// }
    /// # let logger = Logger::builder().output(Sink::new(MemoryWriter::new(), false), false).build().unwrap();
    /// assert_eq!(charge(&logger).unwrap_err().to_string(), "card declined");
    /// ```
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>, fields: impl Into<Fields>) -> LoggerError {
        let message = message.as_ref();
        self.log(LogLevel::Error, message, fields);
        LoggerError::Logged(message.to_string())
    }

    /// Log at `Fatal`, then exit the process with status 1.
    ///
    /// Entries still queued, this one included, may never be written. Call
    /// [`close`](Logger::close) first when the record must survive.
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>, fields: impl Into<Fields>) -> ! {
        self.log(LogLevel::Fatal, message, fields);
        std::process::exit(1)
    }

    /// Log at `Panic`, then panic with the message.
    ///
    /// Same caveat as [`fatal`](Logger::fatal): the queue is not drained.
    #[track_caller]
    pub fn panic(&self, message: impl AsRef<str>, fields: impl Into<Fields>) -> ! {
        let message = message.as_ref();
        self.log(LogLevel::Panic, message, fields);
        panic!("{}", message)
    }

    /// Derived logger with `fields` merged over this logger's default fields.
    ///
    /// The child copies the current level, sinks and formats, shares the
    /// queue and worker, and is closed by `close()` on either logger.
    /// Later changes to one never affect the other.
    #[must_use]
    pub fn with(&self, fields: impl Into<Fields>) -> Logger {
        let mut state = self.state.read().clone();
        state.fields = Arc::new(Fields::merge(&state.fields, &fields.into()));
        Logger {
            state: state.into_shared(),
            pipeline: Arc::clone(&self.pipeline),
        }
    }

    pub fn set_level(&self, level: LogLevel) {
        self.state.write().level = level;
    }

    pub fn level(&self) -> LogLevel {
        self.state.read().level
    }

    pub fn set_time_format(&self, format: impl Into<TimestampFormat>) {
        self.state.write().time_format = format.into();
    }

    pub fn set_format(&self, format: OutputFormat) {
        self.state.write().format = format;
    }

    /// Attach a sink; `additive == false` replaces every existing sink.
    pub fn output(&self, sink: impl Into<Arc<Sink>>, additive: bool) {
        let mut state = self.state.write();
        if !additive {
            state.sinks.clear();
        }
        state.sinks.push(sink.into());
    }

    pub fn add_sink(&self, sink: impl Into<Arc<Sink>>) {
        self.output(sink, true);
    }

    pub fn set_sinks(&self, sinks: Vec<Arc<Sink>>) {
        self.state.write().sinks = sinks;
    }

    pub fn sinks(&self) -> Vec<Arc<Sink>> {
        self.state.read().sinks.clone()
    }

    /// Merge `fields` into this logger's default fields
    pub fn add_fields(&self, fields: impl Into<Fields>) {
        let fields = fields.into();
        let mut state = self.state.write();
        state.fields = Arc::new(Fields::merge(&state.fields, &fields));
    }

    pub fn default_fields(&self) -> Fields {
        Fields::clone(&self.state.read().fields)
    }

    /// Counters shared with every clone and derived logger
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.pipeline.metrics
    }

    pub fn queue_capacity(&self) -> usize {
        self.pipeline.queue.capacity()
    }

    /// Entries accepted but not yet picked up by the worker
    pub fn pending(&self) -> usize {
        self.pipeline.queue.len()
    }

    /// `true` once any logger sharing this queue has been closed
    pub fn is_closed(&self) -> bool {
        self.pipeline.queue.is_closed()
    }

    /// Stop accepting entries, wait until every accepted entry has been
    /// written to every sink, and stop the worker.
    ///
    /// Closing applies to the shared queue, so clones and derived loggers
    /// are closed too. Later calls return [`LoggerError::AlreadyClosed`]
    /// once the first close has finished.
    pub fn close(&self) -> Result<()> {
        let mut worker = self.pipeline.worker.lock();
        self.pipeline.queue.close();

        match worker.take() {
            Some(handle) => {
                let _ = Pipeline::wait(handle, None);
                Ok(())
            }
            None => Err(LoggerError::AlreadyClosed),
        }
    }

    /// Like [`close`](Logger::close), but gives up waiting after `timeout`.
    ///
    /// Returns `true` if the worker finished draining in time. On `false`
    /// the worker keeps draining and a later `close()` can still wait for it.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let mut worker = self.pipeline.worker.lock();
        self.pipeline.queue.close();

        match worker.take() {
            Some(handle) => match Pipeline::wait(handle, Some(timeout)) {
                Ok(()) => true,
                Err(handle) => {
                    eprintln!(
                        "[bayaan WARNING] Log worker did not finish within {:?}. \
                         Some entries may not be written yet.",
                        timeout
                    );
                    *worker = Some(handle);
                    false
                }
            },
            None => true,
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Logger")
            .field("level", &state.level)
            .field("sinks", &state.sinks)
            .field("format", &state.format)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Starts with a single color-enabled stdout sink; use
/// `output(sink, false)` to replace it.
///
/// # Example
/// ```
/// use bayaan::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .time_format("%Y-%m-%d %H:%M:%S")
///     .field("service", "billing")
///     .queue_capacity(256)
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} entries dropped", count);
///     }))
///     .build()
///     .unwrap();
/// # logger.close().unwrap();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sinks: Vec<Arc<Sink>>,
    on_overflow: Option<OverflowCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::from_config(LoggerConfig::default())
    }

    /// Builder seeded from plain-data settings, with the default stdout sink
    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            sinks: vec![Arc::new(Sink::stdout(true))],
            on_overflow: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Attach a sink; `additive == false` replaces every sink so far
    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, sink: impl Into<Arc<Sink>>, additive: bool) -> Self {
        if !additive {
            self.sinks.clear();
        }
        self.sinks.push(sink.into());
        self
    }

    /// Shorthand for `output(sink, true)`
    #[must_use = "builder methods return a new value"]
    pub fn sink(self, sink: impl Into<Arc<Sink>>) -> Self {
        self.output(sink, true)
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: impl Into<TimestampFormat>) -> Self {
        self.config.time_format = format.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Merge `fields` into the default fields
    #[must_use = "builder methods return a new value"]
    pub fn fields(mut self, fields: impl Into<Fields>) -> Self {
        self.config.fields.extend_from(&fields.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.config.fields.insert(key, value);
        self
    }

    /// Number of entries the queue holds before new ones are dropped
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Record the `file:line` of each call site (default `true`)
    #[must_use = "builder methods return a new value"]
    pub fn include_caller(mut self, include: bool) -> Self {
        self.config.include_caller = include;
        self
    }

    /// Set a callback invoked with the running drop count each time a full
    /// queue drops an entry
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Build the Logger and start its worker
    pub fn build(self) -> Result<Logger> {
        if self.config.queue_capacity == 0 {
            return Err(LoggerError::config(
                "queue",
                "capacity must be greater than zero",
            ));
        }

        let metrics = Arc::new(LoggerMetrics::new());
        let (queue, receiver) =
            EntryQueue::bounded(self.config.queue_capacity, Arc::clone(&metrics), self.on_overflow);
        let handle = worker::spawn(receiver, Arc::clone(&metrics))?;

        let state = LoggerState {
            level: self.config.level,
            sinks: self.sinks,
            time_format: self.config.time_format,
            format: self.config.format,
            include_caller: self.config.include_caller,
            fields: Arc::new(self.config.fields),
        };

        Ok(Logger {
            state: state.into_shared(),
            pipeline: Arc::new(Pipeline {
                queue,
                worker: Mutex::new(Some(handle)),
                metrics,
            }),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
