//! Line-oriented progress stream
//!
//! Each message is written as one line and flushed right away so a consumer
//! tailing stdout sees it as soon as it happens.

use std::io::{self, Write};

pub struct ProgressReporter {
    out: Box<dyn Write + Send>,
}

impl ProgressReporter {
    /// Report to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    /// Discard all messages
    pub fn silent() -> Self {
        Self::new(io::sink())
    }

    /// Emit one status line
    pub fn send(&mut self, message: impl AsRef<str>) {
        let result = writeln!(self.out, "{}", message.as_ref()).and_then(|_| self.out.flush());
        if let Err(e) = result {
            // A closed consumer must not abort the job
            tracing::debug!("Progress stream unavailable: {}", e);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::stdout()
    }
}
