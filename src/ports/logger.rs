// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging collaborator handed to codecs and configuration stores.
//!
//! Each codec and store owns a `LogSink` instead of reaching for a process-wide
//! logger. A sink wraps a `tracing` [`Dispatch`]; every event the owner emits is
//! routed to that dispatcher, whatever the thread's default happens to be.
//! `Value` holds no sink, so the few events it emits while coercing a node go to
//! the thread's default dispatcher.

use crate::domain::{Result, TreeError};
use tracing::dispatcher::{self, Dispatch};
use tracing::subscriber::NoSubscriber;
use tracing::Subscriber;

/// An injected `tracing` dispatcher.
///
/// # Examples
///
/// ```rust
/// use treecfg::ports::LogSink;
///
/// // Capture whatever subscriber is the default right now.
/// let sink = LogSink::current();
///
/// // Or discard everything.
/// let quiet = LogSink::silent();
/// quiet.in_scope(|| tracing::error!("never seen"));
/// # drop(sink);
/// ```
#[derive(Clone, Debug)]
pub struct LogSink {
    dispatch: Dispatch,
}

impl LogSink {
    /// Creates a sink bound to the thread's current default dispatcher.
    pub fn current() -> Self {
        Self {
            dispatch: dispatcher::get_default(|dispatch| dispatch.clone()),
        }
    }

    /// Creates a sink bound to the given dispatcher.
    pub fn from_dispatch(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// Creates a sink that forwards to the given subscriber.
    pub fn from_subscriber<S>(subscriber: S) -> Self
    where
        S: Subscriber + Send + Sync + 'static,
    {
        Self::from_dispatch(Dispatch::new(subscriber))
    }

    /// Creates a sink that discards every event.
    pub fn silent() -> Self {
        Self::from_subscriber(NoSubscriber::default())
    }

    /// Runs `f` with this sink's dispatcher as the default.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }

    /// Emits an error event describing `err`.
    pub fn error(&self, err: &TreeError) {
        self.in_scope(|| tracing::error!(kind = ?err.kind(), "{}", err));
    }

    /// Logs the error of a failed result and passes the result through unchanged.
    pub fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.error(err);
        }
        result
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::current()
    }
}
