//! Debounced search input
//!
//! Single-slot cancellable timer: each keystroke cancels the pending delay
//! and arms a new one, so only the last input within the quiet window
//! reaches the orchestrator. Clearing the field skips the delay entirely.
//! In-flight fetches are never cancelled here; the orchestrator's sequence
//! guard neutralizes superseded completions.

use crate::orchestrator::FetchOrchestrator;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

/// Quiet window before a search fires
pub const DEBOUNCE_MS: u64 = 500;

pub struct SearchDebouncer {
    orchestrator: Arc<FetchOrchestrator>,
    delay: Duration,
    pending: Mutex<CancellationToken>,
}

impl SearchDebouncer {
    pub fn new(orchestrator: Arc<FetchOrchestrator>) -> Self {
        Self::with_delay(orchestrator, Duration::from_millis(DEBOUNCE_MS))
    }

    pub fn with_delay(orchestrator: Arc<FetchOrchestrator>, delay: Duration) -> Self {
        Self {
            orchestrator,
            delay,
            pending: Mutex::new(CancellationToken::new()),
        }
    }

    /// Handle a search-field keystroke.
    ///
    /// Blank text bypasses the debounce: the pending timer is cancelled and
    /// the search-cleared fallback runs immediately.
    pub async fn on_input(&self, text: &str) {
        let token = self.rearm();

        if text.trim().is_empty() {
            token.cancel();
            self.orchestrator.search("").await;
            return;
        }

        let orchestrator = Arc::clone(&self.orchestrator);
        let query = text.to_string();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    orchestrator.search(&query).await;
                }
            }
        });
    }

    /// Cancel any pending timer and install a fresh token for the next one
    fn rearm(&self) -> CancellationToken {
        let mut pending = self.pending.lock();
        pending.cancel();
        *pending = CancellationToken::new();
        pending.clone()
    }

    /// Cancel without firing (teardown)
    pub fn cancel(&self) {
        self.pending.lock().cancel();
    }
}
