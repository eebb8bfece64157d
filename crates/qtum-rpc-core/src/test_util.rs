//! Shared test helpers for `qtum-rpc-core` unit tests.

use std::sync::Mutex;

use crate::log::RpcLogger;

/// Logger that keeps every message with its channel name.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLogger {
    /// Messages recorded on `channel` (`"info"`, `"warn"`, `"error"` or `"debug"`).
    pub fn messages(&self, channel: &str) -> Vec<String> {
        self.entries
            .lock()
            .expect("log lock")
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn record(&self, channel: &'static str, message: &str) {
        self.entries
            .lock()
            .expect("log lock")
            .push((channel, message.to_owned()));
    }
}

impl RpcLogger for RecordingLogger {
    fn info(&self, message: &str) {
        self.record("info", message);
    }

    fn warn(&self, message: &str) {
        self.record("warn", message);
    }

    fn error(&self, message: &str) {
        self.record("error", message);
    }

    fn debug(&self, message: &str) {
        self.record("debug", message);
    }
}
