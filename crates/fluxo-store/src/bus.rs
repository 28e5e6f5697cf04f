//! # Notification Bus
//!
//! Content-free "the document changed" signals between instances.
//!
//! ## Delivery Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ChangeBus Delivery                               │
//! │                                                                         │
//! │  write ──► publish(()) ──► every live ChangeListener, WRITER INCLUDED  │
//! │                                                                         │
//! │  • Signals carry no payload; the reaction is always "re-read"          │
//! │  • At least one signal per successful write                            │
//! │  • Duplicates and lag collapse harmlessly: refresh is idempotent       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Built on `tokio::sync::broadcast` with a small buffer: a listener that
//! falls behind gets `Lagged`, which we report as a single pending change.
//! Missing N signals and seeing one is the same thing here.

use tokio::sync::broadcast;

/// Buffer depth per listener. Refreshes are idempotent so depth only
/// matters for how often slow listeners see `Lagged`, never for
/// correctness.
const CHANGE_BUFFER: usize = 16;

/// Publisher half of the change-signal channel. One per store.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<()>,
}

impl ChangeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_BUFFER);
        ChangeBus { tx }
    }

    /// Announces one committed write to every subscriber. A send error
    /// only means nobody is listening, which is fine.
    pub fn publish(&self) {
        let _ = self.tx.send(());
    }

    /// Opens a new listener. Only writes AFTER this call are signalled.
    pub fn subscribe(&self) -> ChangeListener {
        ChangeListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber half: awaits change signals.
#[derive(Debug)]
pub struct ChangeListener {
    rx: broadcast::Receiver<()>,
}

impl ChangeListener {
    /// Waits for at least one change since the last call.
    ///
    /// Returns `false` only when the bus is gone (store dropped); `true`
    /// means "re-read the document", whether one write or many happened.
    pub async fn changed(&mut self) -> bool {
        loop {
            match self.rx.recv().await {
                Ok(()) => return true,
                // Lag means we missed signals; one pending change remains.
                Err(broadcast::error::RecvError::Lagged(_)) => return true,
                Err(broadcast::error::RecvError::Closed) => return false,
            }
        }
    }

    /// Non-blocking probe used by tests and polling callers.
    pub fn try_changed(&mut self) -> bool {
        match self.rx.try_recv() {
            Ok(()) => true,
            Err(broadcast::error::TryRecvError::Lagged(_)) => true,
            Err(_) => false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
