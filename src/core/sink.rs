//! Sinks: a byte-stream destination paired with a color flag

use super::log_level::LogLevel;
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};

const RESET: &str = "\x1b[0m";

/// A write destination plus its rendering mode
///
/// Sinks are shared as `Arc<Sink>` between the logger's configuration
/// snapshot and the worker. Only the worker writes, so the inner lock is
/// uncontended on the write path.
pub struct Sink {
    name: String,
    use_color: bool,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Sink {
    pub fn new<W>(writer: W, use_color: bool) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::named("custom", writer, use_color)
    }

    pub fn named<W>(name: impl Into<String>, writer: W, use_color: bool) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            name: name.into(),
            use_color,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Write one rendered record, color-wrapped if this sink wants color.
    ///
    /// `record` must already end with a newline.
    pub fn write_record(&self, record: &str, level: LogLevel) -> io::Result<()> {
        let mut writer = self.writer.lock();
        if self.use_color {
            writer.write_all(colorize(record, level).as_bytes())
        } else {
            writer.write_all(record.as_bytes())
        }
    }

    pub fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("name", &self.name)
            .field("use_color", &self.use_color)
            .finish_non_exhaustive()
    }
}

/// Wrap a record in the level's ANSI foreground color.
///
/// The trailing newline stays outside the escape so line-oriented readers
/// see the reset on the same line.
pub fn colorize(record: &str, level: LogLevel) -> String {
    let body = record.strip_suffix('\n').unwrap_or(record);
    let newline = if body.len() < record.len() { "\n" } else { "" };
    format!(
        "\x1b[{}m{}{}{}",
        level.color_code().to_fg_str(),
        body,
        RESET,
        newline
    )
}
