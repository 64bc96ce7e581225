//! Logger metrics for observability
//!
//! Counters shared by a logger, its clones and its derived loggers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing what happened to submitted entries
///
/// # Example
///
/// ```
/// use bayaan::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_accepted();
/// metrics.record_dropped();
///
/// assert_eq!(metrics.accepted(), 1);
/// assert_eq!(metrics.dropped(), 1);
/// assert_eq!(metrics.drop_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries accepted into the queue
    accepted: AtomicU64,

    /// Entries dropped because the queue was full
    dropped: AtomicU64,

    /// Entries submitted after the queue was closed
    rejected: AtomicU64,

    /// Entries rendered and fanned out to the sinks
    rendered: AtomicU64,

    /// Entries discarded by the worker for being below the current level
    filtered: AtomicU64,

    /// Entries whose rendering failed and were replaced with a placeholder
    render_failures: AtomicU64,

    /// Individual sink writes that failed or panicked
    sink_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            rendered: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            render_failures: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rendered(&self) -> u64 {
        self.rendered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn render_failures(&self) -> u64 {
        self.render_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    /// Each `record_*` returns the previous value
    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rendered(&self) -> u64 {
        self.rendered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_render_failure(&self) -> u64 {
        self.render_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Percentage (0.0 - 100.0) of submissions lost to a full queue
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped() as f64;
        let total = self.accepted() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            accepted: AtomicU64::new(self.accepted()),
            dropped: AtomicU64::new(self.dropped()),
            rejected: AtomicU64::new(self.rejected()),
            rendered: AtomicU64::new(self.rendered()),
            filtered: AtomicU64::new(self.filtered()),
            render_failures: AtomicU64::new(self.render_failures()),
            sink_failures: AtomicU64::new(self.sink_failures()),
        }
    }
}
