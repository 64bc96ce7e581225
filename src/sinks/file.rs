//! Append-mode file sink

use crate::core::{LoggerError, Result, Sink};
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;

impl Sink {
    /// Open (or create) `path` for appending and write records to it.
    ///
    /// Output is buffered; the worker flushes whenever the queue runs empty
    /// and when the logger closes.
    ///
    /// ```no_run
    /// use bayaan::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .sink(Sink::file("/var/log/app.log", false).unwrap())
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn file(path: impl AsRef<Path>, use_color: bool) -> Result<Self> {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let file = options.open(path).map_err(|e| {
            LoggerError::io_operation("opening log file", path.display().to_string(), e)
        })?;

        Ok(Sink::named(
            path.display().to_string(),
            BufWriter::new(file),
            use_color,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_sink_appends() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        fs::write(&path, "existing\n")?;

        let sink = Sink::file(&path, false)?;
        sink.write_record("WARN: appended\n", LogLevel::Warn)?;
        sink.flush()?;

        assert_eq!(fs::read_to_string(&path)?, "existing\nWARN: appended\n");
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("app.log");

        let err = Sink::file(&path, false).unwrap_err();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
    }
}
