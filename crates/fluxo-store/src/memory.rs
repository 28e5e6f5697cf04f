//! In-memory document store.
//!
//! The canonical shared medium for in-process deployments and for
//! multi-instance tests: several controllers hold the same
//! `Arc<MemoryStore>` and observe each other's writes through the bus.

use async_trait::async_trait;
use fluxo_core::AppState;
use tokio::sync::RwLock;
use tracing::debug;

use crate::bus::{ChangeBus, ChangeListener};
use crate::document::DocumentStore;
use crate::error::StoreResult;

/// Whole-document store backed by a `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RwLock<Option<AppState>>,
    bus: ChangeBus,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with a document, for tests that need a known
    /// starting point without going through `read`.
    pub fn with_document(state: AppState) -> Self {
        MemoryStore {
            document: RwLock::new(Some(state)),
            bus: ChangeBus::new(),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self) -> StoreResult<AppState> {
        {
            let guard = self.document.read().await;
            if let Some(state) = guard.as_ref() {
                return Ok(state.clone());
            }
        }
        // First access: seed under the write lock, re-checking in case a
        // concurrent reader seeded between the two lock acquisitions.
        let mut guard = self.document.write().await;
        let state = guard.get_or_insert_with(|| {
            debug!("seeding in-memory document");
            AppState::seed()
        });
        Ok(state.clone())
    }

    async fn write(&self, next: &AppState) -> StoreResult<()> {
        {
            let mut guard = self.document.write().await;
            *guard = Some(next.clone());
        }
        // Lock released before the signal: a listener's re-read never
        // contends with the write that woke it.
        self.bus.publish();
        Ok(())
    }

    fn subscribe(&self) -> ChangeListener {
        self.bus.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
