//! Console sinks

use crate::core::Sink;
use std::io;

impl Sink {
    /// Sink writing to standard output
    pub fn stdout(use_color: bool) -> Self {
        Sink::named("stdout", io::stdout(), use_color)
    }

    /// Sink writing to standard error
    pub fn stderr(use_color: bool) -> Self {
        Sink::named("stderr", io::stderr(), use_color)
    }
}
