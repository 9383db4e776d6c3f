//! Terminal-backed status display and alert cue.

use std::io::{self, Write};

use crate::ports::{AlertSink, StatusSink};
use crate::status::Status;

/// Logs the status text whenever it changes.
#[derive(Debug, Default)]
pub struct LogStatusSink {
    last: Option<Status>,
}

impl LogStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Status> {
        self.last
    }
}

impl StatusSink for LogStatusSink {
    fn show(&mut self, status: Status) {
        if self.last == Some(status) {
            return;
        }
        self.last = Some(status);
        tracing::info!(status = status.as_str(), "{}", status.label());
    }

    fn show_error(&mut self, message: &str) {
        tracing::error!(error = message, "Status display error");
    }
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default)]
pub struct BellAlertSink {
    played: u64,
}

impl BellAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AlertSink for BellAlertSink {
    fn play(&mut self) {
        self.played += 1;
        let mut stderr = io::stderr().lock();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
            tracing::warn!(error = %e, "Failed to ring terminal bell");
        }
    }
}
