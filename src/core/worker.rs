//! The single background task that renders queued entries
//!
//! The worker reads each entry's logger configuration at render time, so
//! level, sink and field changes apply to everything not yet rendered.
//! It exits once the queue is closed and every accepted entry is written.

use super::config::LoggerState;
use super::error::{LoggerError, Result};
use super::fields::Fields;
use super::metrics::LoggerMetrics;
use super::output_format::OutputFormat;
use super::queue::Queued;
use super::sink::Sink;
use crossbeam_channel::Receiver;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

const WORKER_THREAD_NAME: &str = "bayaan-worker";

pub(crate) fn spawn(
    receiver: Receiver<Queued>,
    metrics: Arc<LoggerMetrics>,
) -> Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || run(receiver, metrics))
        .map_err(LoggerError::WorkerSpawn)
}

fn run(receiver: Receiver<Queued>, metrics: Arc<LoggerMetrics>) {
    // Sinks written since the last flush
    let mut dirty: Vec<Arc<Sink>> = Vec::new();

    // `recv` only fails once the queue is closed and empty
    while let Ok(queued) = receiver.recv() {
        process(&queued, &metrics, &mut dirty);

        if receiver.is_empty() {
            flush_all(&mut dirty, &metrics);
        }
    }

    flush_all(&mut dirty, &metrics);
}

/// Copy of the view's configuration, taken under the read lock.
///
/// `None` if the entry is below the level in force right now.
fn snapshot(queued: &Queued) -> Option<LoggerState> {
    let state = queued.state.read();
    if queued.entry.level < state.level {
        return None;
    }
    Some(state.clone())
}

fn process(queued: &Queued, metrics: &LoggerMetrics, dirty: &mut Vec<Arc<Sink>>) {
    // The lock is released here, before any sink is touched
    let Some(state) = snapshot(queued) else {
        metrics.record_filtered();
        return;
    };

    let entry = &queued.entry;
    let fields = Fields::merge(&state.fields, &entry.fields);
    let record = state
        .format
        .render(entry, &fields, &state.time_format, state.include_caller)
        .unwrap_or_else(|err| {
            metrics.record_render_failure();
            OutputFormat::placeholder(entry, &err)
        });

    for sink in &state.sinks {
        let written = catch_unwind(AssertUnwindSafe(|| sink.write_record(&record, entry.level)));
        match written {
            Ok(Ok(())) => {
                if !dirty.iter().any(|d| Arc::ptr_eq(d, sink)) {
                    dirty.push(Arc::clone(sink));
                }
            }
            // One failing sink never stops the fan-out
            Ok(Err(_)) | Err(_) => {
                metrics.record_sink_failure();
            }
        }
    }

    metrics.record_rendered();
}

fn flush_all(dirty: &mut Vec<Arc<Sink>>, metrics: &LoggerMetrics) {
    for sink in dirty.drain(..) {
        let flushed = catch_unwind(AssertUnwindSafe(|| sink.flush()));
        if !matches!(flushed, Ok(Ok(()))) {
            metrics.record_sink_failure();
        }
    }
}
