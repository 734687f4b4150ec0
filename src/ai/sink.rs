//! Result sinks: where finished suggestions go for display.
//!
//! The presentation layer injects a sink instead of reading a global
//! "latest output" value. `None` clears whatever was shown before.

use super::service::SuggestionResult;
use tokio::sync::watch;

pub trait SuggestionSink: Send + Sync {
    fn publish(&self, result: Option<&SuggestionResult>);
}

/// Discards everything.
pub struct NoopSink;

impl SuggestionSink for NoopSink {
    fn publish(&self, _result: Option<&SuggestionResult>) {}
}

/// Latest-value channel; subscribers always see the most recent publication.
pub struct WatchSink {
    tx: watch::Sender<Option<SuggestionResult>>,
}

impl WatchSink {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SuggestionResult>> {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> Option<SuggestionResult> {
        self.tx.borrow().clone()
    }
}

impl Default for WatchSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionSink for WatchSink {
    fn publish(&self, result: Option<&SuggestionResult>) {
        // send_replace works without live receivers.
        self.tx.send_replace(result.cloned());
        tracing::debug!(present = result.is_some(), "published suggestion");
    }
}
