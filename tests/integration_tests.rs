//! Integration tests for the logging pipeline
//!
//! These tests verify:
//! - Level filtering at render time
//! - Field merge precedence and derived loggers
//! - Color and plain sinks side by side
//! - Drop-on-full with a stalled sink
//! - Drain on close, including via `Drop`
//! - File sinks and JSON configuration

use bayaan::prelude::*;
use bayaan::{fields, DEFAULT_QUEUE_CAPACITY};
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn capture(level: LogLevel, format: OutputFormat) -> (Logger, MemoryWriter) {
    let buffer = MemoryWriter::new();
    let logger = Logger::builder()
        .level(level)
        .format(format)
        .include_caller(false)
        .output(Sink::new(buffer.clone(), false), false)
        .build()
        .expect("Failed to build logger");
    (logger, buffer)
}

/// Writer that parks the worker inside `write` until released
#[derive(Clone, Default)]
struct GateWriter {
    inner: MemoryWriter,
    gate: Arc<Gate>,
}

#[derive(Default)]
struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
    entered: AtomicUsize,
}

impl GateWriter {
    fn wait_until_entered(&self, count: usize) {
        let start = Instant::now();
        while self.gate.entered.load(Ordering::SeqCst) < count {
            assert!(
                start.elapsed() < Duration::from_secs(5),
                "worker never reached the sink"
            );
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn release(&self) {
        *self.gate.open.lock().unwrap() = true;
        self.gate.cv.notify_all();
    }
}

impl Write for GateWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.gate.entered.fetch_add(1, Ordering::SeqCst);
        let mut open = self.gate.open.lock().unwrap();
        while !*open {
            open = self.gate.cv.wait(open).unwrap();
        }
        drop(open);
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_warn_level_hides_info_and_shows_error() {
    let (logger, buffer) = capture(LogLevel::Warn, OutputFormat::Text);

    logger.info("hidden", Fields::new());
    let _ = logger.error("shown", [("code", 500)]);
    logger.close().expect("Failed to close");

    let content = buffer.contents();
    assert_eq!(content.lines().filter(|l| l.contains("shown")).count(), 1);
    assert_eq!(content.lines().filter(|l| l.contains("hidden")).count(), 0);
    assert!(content.lines().any(|l| l == "code: 500"));
}

#[test]
fn test_lower_levels_produce_no_output() {
    for (i, &threshold) in LogLevel::ALL.iter().enumerate() {
        let (logger, buffer) = capture(threshold, OutputFormat::Json);
        for &level in &LogLevel::ALL[..i] {
            logger.log(level, "below threshold", Fields::new());
        }
        logger.close().unwrap();

        assert!(buffer.is_empty(), "{} let lower levels through", threshold);
        assert_eq!(logger.metrics().filtered(), i as u64);
    }
}

#[test]
fn test_color_and_plain_sinks_differ_only_in_escapes() {
    let plain = MemoryWriter::new();
    let colored = MemoryWriter::new();
    let logger = Logger::builder()
        .format(OutputFormat::Json)
        .output(Sink::new(plain.clone(), false), false)
        .output(Sink::new(colored.clone(), true), true)
        .build()
        .unwrap();

    logger.warn("disk almost full", [("free_mb", 12)]);
    logger.close().unwrap();

    assert_eq!(plain.lines().len(), 1);
    assert_eq!(colored.lines().len(), 1);

    let plain_line = plain.lines().remove(0);
    let colored_line = colored.lines().remove(0);
    assert!(!plain_line.contains('\x1b'));

    let unwrapped = colored_line
        .strip_prefix("\x1b[36m")
        .and_then(|l| l.strip_suffix("\x1b[0m"))
        .expect("colored line should be wrapped in the warn color");
    assert_eq!(unwrapped, plain_line);
}

#[test]
fn test_full_queue_drops_while_sink_is_stalled() {
    const CAPACITY: usize = 4;

    let gate = GateWriter::default();
    let overflow_calls = Arc::new(AtomicU64::new(0));
    let overflow_calls_clone = Arc::clone(&overflow_calls);

    let logger = Logger::builder()
        .format(OutputFormat::Json)
        .queue_capacity(CAPACITY)
        .output(Sink::new(gate.clone(), false), false)
        .on_overflow(Arc::new(move |_dropped| {
            overflow_calls_clone.fetch_add(1, Ordering::SeqCst);
        }))
        .build()
        .unwrap();

    // The worker takes this one and parks inside the sink
    assert!(logger.info("e0", Fields::new()).is_accepted());
    gate.wait_until_entered(1);

    for i in 1..=CAPACITY {
        assert_eq!(logger.info(format!("e{}", i), Fields::new()), Enqueue::Accepted);
    }

    let start = Instant::now();
    let extra = logger.info("overflow", Fields::new());
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(extra, Enqueue::Dropped);
    assert_eq!(overflow_calls.load(Ordering::SeqCst), 1);
    assert_eq!(logger.metrics().dropped(), 1);

    gate.release();
    logger.close().unwrap();

    let messages: Vec<String> = gate
        .inner
        .lines()
        .iter()
        .map(|line| {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            parsed["message"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(messages, vec!["e0", "e1", "e2", "e3", "e4"]);
}

#[test]
fn test_overflow_callback_can_log_while_closing() {
    let gate = GateWriter::default();
    let slot: Arc<Mutex<Option<Logger>>> = Arc::new(Mutex::new(None));
    let slot_clone = Arc::clone(&slot);

    let logger = Logger::builder()
        .queue_capacity(1)
        .include_caller(false)
        .output(Sink::new(gate.clone(), false), false)
        .on_overflow(Arc::new(move |dropped| {
            let logger = slot_clone.lock().unwrap().clone();
            if let Some(logger) = logger {
                // Give `close()` time to start waiting on the queue
                thread::sleep(Duration::from_millis(300));
                logger.warn("entries dropped", [("dropped", dropped)]);
            }
        }))
        .build()
        .unwrap();
    *slot.lock().unwrap() = Some(logger.clone());

    logger.info("e0", Fields::new());
    gate.wait_until_entered(1);
    assert!(logger.info("e1", Fields::new()).is_accepted());

    let (tx, rx) = mpsc::channel();
    let producer = {
        let logger = logger.clone();
        thread::spawn(move || {
            let _ = tx.send(logger.info("e2", Fields::new()));
        })
    };

    thread::sleep(Duration::from_millis(50));
    let closer = {
        let logger = logger.clone();
        let gate = gate.clone();
        thread::spawn(move || {
            gate.release();
            logger.close()
        })
    };

    let outcome = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("overflowing producer never returned");
    assert_eq!(outcome, Enqueue::Dropped);
    producer.join().unwrap();
    closer.join().unwrap().unwrap();

    // Break the logger <-> callback cycle
    slot.lock().unwrap().take();

    let content = gate.inner.contents();
    assert!(content.contains("INFO: e0"));
    assert!(content.contains("INFO: e1"));
    assert!(!content.contains("INFO: e2"));
}

#[test]
fn test_level_change_applies_to_queued_entries() {
    let gate = GateWriter::default();
    let logger = Logger::builder()
        .level(LogLevel::Debug)
        .output(Sink::new(gate.clone(), false), false)
        .build()
        .unwrap();

    logger.error("parked", Fields::new());
    gate.wait_until_entered(1);

    // Accepted while Debug was in force, rendered after the change
    logger.debug("queued debug", Fields::new());
    logger.error("queued error", Fields::new());
    logger.set_level(LogLevel::Error);

    gate.release();
    logger.close().unwrap();

    let content = gate.inner.contents();
    assert!(content.contains("ERROR: parked"));
    assert!(content.contains("ERROR: queued error"));
    assert!(!content.contains("queued debug"));
    assert_eq!(logger.metrics().filtered(), 1);
}

#[test]
fn test_close_drains_every_sink() {
    const K: usize = 300;

    let first = MemoryWriter::new();
    let second = MemoryWriter::new();
    let logger = Logger::builder()
        .format(OutputFormat::Logfmt)
        .output(Sink::new(first.clone(), false), false)
        .sink(Sink::new(second.clone(), true))
        .build()
        .unwrap();

    for i in 0..K {
        assert!(logger.info(format!("entry {}", i), Fields::new()).is_accepted());
    }
    logger.close().unwrap();

    assert_eq!(first.lines().len(), K);
    assert_eq!(second.lines().len(), K);
    assert_eq!(logger.metrics().rendered(), K as u64);
}

#[test]
fn test_single_producer_fifo() {
    let (logger, buffer) = capture(LogLevel::Trace, OutputFormat::Json);

    for i in 0..500u64 {
        logger.debug("tick", [("seq", i)]);
    }
    logger.close().unwrap();

    let seqs: Vec<u64> = buffer
        .lines()
        .iter()
        .map(|line| {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            parsed["seq"].as_u64().unwrap()
        })
        .collect();
    assert_eq!(seqs, (0..500).collect::<Vec<_>>());
}

#[test]
fn test_field_precedence() {
    let buffer = MemoryWriter::new();
    let logger = Logger::builder()
        .format(OutputFormat::Json)
        .output(Sink::new(buffer.clone(), false), false)
        .fields([("x", 1), ("y", 1)])
        .build()
        .unwrap();
    let child = logger.with([("y", 2), ("z", 2)]);

    child.info("merged", fields! { "x" => 2, "message" => "spoofed" });
    logger.info("parent", Fields::new());
    logger.close().unwrap();

    let lines = buffer.lines();
    let child_record: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(child_record["x"], 2);
    assert_eq!(child_record["y"], 2);
    assert_eq!(child_record["z"], 2);
    assert_eq!(child_record["message"], "merged");

    let parent_record: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(parent_record["x"], 1);
    assert_eq!(parent_record["y"], 1);
    assert!(parent_record.get("z").is_none());
}

#[test]
fn test_runtime_reconfiguration() {
    let (logger, first) = capture(LogLevel::Info, OutputFormat::Text);
    logger.info("one", Fields::new());

    let second = MemoryWriter::new();
    logger.output(Sink::new(second.clone(), false), false);
    logger.set_format(OutputFormat::Json);
    logger.set_time_format(TimestampFormat::UnixMillis);
    logger.add_fields([("build", "abc123")]);
    logger.info("two", Fields::new());
    logger.close().unwrap();

    // Sinks are read at render time, so "one" may land on either buffer
    let all = format!("{}{}", first.contents(), second.contents());
    assert!(all.contains("one"));

    let record: serde_json::Value = serde_json::from_str(second.lines().last().unwrap()).unwrap();
    assert_eq!(record["message"], "two");
    assert_eq!(record["build"], "abc123");
    assert!(record["timestamp"].is_i64());
}

#[test]
fn test_post_close_submissions_are_no_ops() {
    let (logger, buffer) = capture(LogLevel::Info, OutputFormat::Text);
    logger.close().unwrap();

    assert_eq!(logger.info("late", Fields::new()), Enqueue::Closed);
    assert_eq!(logger.with([("a", 1)]).warn("late child", Fields::new()), Enqueue::Closed);
    assert!(matches!(logger.close(), Err(LoggerError::AlreadyClosed)));
    assert!(buffer.is_empty());
    assert_eq!(logger.metrics().rejected(), 2);
}

#[test]
fn test_dropping_last_handle_drains() {
    let buffer = MemoryWriter::new();
    {
        let logger = Logger::builder()
            .output(Sink::new(buffer.clone(), false), false)
            .build()
            .unwrap();
        let child = logger.with([("scope", "inner")]);
        for i in 0..50 {
            child.info(format!("dropped handle {}", i), Fields::new());
        }
    }

    assert_eq!(buffer.contents().matches("INFO: dropped handle").count(), 50);
}

#[test]
fn test_file_sink_end_to_end() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let logger = Logger::builder()
        .output(Sink::file(&log_file, false).expect("Failed to open log file"), false)
        .format(OutputFormat::Json)
        .build()
        .unwrap();

    for i in 0..20 {
        logger.info(format!("Message {}", i), [("i", i)]);
    }
    logger.close().unwrap();

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 20, "Should have 20 log entries");
    for line in lines {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(parsed["level"], "INFO");
        assert!(parsed["caller"]
            .as_str()
            .unwrap()
            .starts_with("tests/integration_tests.rs:"));
    }
}

#[test]
fn test_builder_from_json_config() {
    let config = LoggerConfig::from_json(
        r#"{
            "level": "error",
            "format": "logfmt",
            "time_format": "unix",
            "include_caller": false,
            "fields": { "service": "billing" }
        }"#,
    )
    .unwrap();

    let buffer = MemoryWriter::new();
    let logger = LoggerBuilder::from_config(config)
        .output(Sink::new(buffer.clone(), false), false)
        .build()
        .unwrap();

    logger.warn("ignored", Fields::new());
    let _ = logger.error("payment failed", [("code", 502)]);
    logger.close().unwrap();

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("level=ERROR"));
    assert!(lines[0].contains("message=\"payment failed\""));
    assert!(lines[0].contains("service=billing"));
    assert!(lines[0].contains("code=502"));
    assert!(!lines[0].contains("caller="));
}

#[test]
fn test_default_capacity() {
    let (logger, _buffer) = capture(LogLevel::Info, OutputFormat::Text);
    assert_eq!(logger.queue_capacity(), DEFAULT_QUEUE_CAPACITY);
    logger.close().unwrap();
}

#[test]
fn test_field_values_cannot_inject_records() {
    let (logger, buffer) = capture(LogLevel::Info, OutputFormat::Text);

    logger.info("login", [("user", "bob\nERROR: forged record")]);
    logger.close().unwrap();

    let lines = buffer.lines();
    assert_eq!(lines[0], "INFO: login");
    assert!(!lines.iter().any(|l| l.starts_with("ERROR:")));
    assert!(lines.iter().any(|l| l == "user: bob\\nERROR: forged record"));
}
