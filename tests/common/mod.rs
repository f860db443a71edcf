// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for the integration tests.

use std::io;
use std::sync::{Arc, Mutex};
use treecfg::ports::LogSink;

/// An in-memory writer collecting everything a `tracing` subscriber prints.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Returns everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Creates a sink that records every event at `DEBUG` and above.
#[allow(dead_code)]
pub fn capturing_sink() -> (LogSink, CapturedLogs) {
    let captured = CapturedLogs::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    (LogSink::from_subscriber(subscriber), captured)
}
