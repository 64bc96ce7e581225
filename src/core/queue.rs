//! Bounded entry queue between producers and the worker
//!
//! Submission never blocks: a full queue drops the entry and emits a
//! one-line warning from the submitting thread.

use super::config::SharedState;
use super::log_entry::LogEntry;
use super::metrics::LoggerMetrics;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use std::sync::Arc;

/// Default number of entries the queue holds before dropping
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Callback invoked on every dropped entry with the total drop count so far
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Outcome of submitting an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueue {
    /// The entry is in the queue and will be rendered
    Accepted,
    /// The queue was full; the entry is lost
    Dropped,
    /// The queue was closed before the call; the entry is lost
    Closed,
}

impl Enqueue {
    #[inline]
    pub fn is_accepted(self) -> bool {
        self == Enqueue::Accepted
    }
}

/// An entry plus the configuration of the logger view that produced it
pub(crate) struct Queued {
    pub entry: LogEntry,
    pub state: SharedState,
}

pub(crate) struct EntryQueue {
    /// `None` once closed. Dropping the only sender disconnects the
    /// channel, which lets the worker drain and exit.
    sender: RwLock<Option<Sender<Queued>>>,
    capacity: usize,
    metrics: Arc<LoggerMetrics>,
    on_overflow: Option<OverflowCallback>,
}

impl EntryQueue {
    pub fn bounded(
        capacity: usize,
        metrics: Arc<LoggerMetrics>,
        on_overflow: Option<OverflowCallback>,
    ) -> (Self, Receiver<Queued>) {
        let (sender, receiver) = bounded(capacity);
        let queue = Self {
            sender: RwLock::new(Some(sender)),
            capacity,
            metrics,
            on_overflow,
        };
        (queue, receiver)
    }

    pub fn enqueue(&self, queued: Queued) -> Enqueue {
        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            self.metrics.record_rejected();
            return Enqueue::Closed;
        };

        match sender.try_send(queued) {
            Ok(()) => {
                self.metrics.record_accepted();
                Enqueue::Accepted
            }
            Err(TrySendError::Full(queued)) => {
                let queued_len = sender.len();
                // The callback may log through this queue or race `close()`
                drop(guard);
                self.report_drop(&queued.entry, queued_len);
                Enqueue::Dropped
            }
            Err(TrySendError::Disconnected(_)) => {
                // Worker is gone (it panicked); nothing will ever drain this
                self.metrics.record_rejected();
                Enqueue::Closed
            }
        }
    }

    /// Runs without the sender lock held.
    fn report_drop(&self, entry: &LogEntry, queued: usize) {
        let dropped = self.metrics.record_dropped() + 1;
        eprintln!(
            "[bayaan WARNING] Log queue full ({}/{}), dropped {} entry \"{}\" ({} dropped in total)",
            queued,
            self.capacity,
            entry.level,
            entry.message,
            dropped
        );
        if let Some(ref callback) = self.on_overflow {
            callback(dropped);
        }
    }

    /// Stop accepting entries. Returns `false` if already closed.
    pub fn close(&self) -> bool {
        self.sender.write().take().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries currently waiting for the worker
    pub fn len(&self) -> usize {
        self.sender.read().as_ref().map_or(0, Sender::len)
    }
}
