//! # Document Store Trait
//!
//! Whole-document persistence for the shared `AppState`.
//!
//! ## Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      DocumentStore Contract                             │
//! │                                                                         │
//! │  read()   ──► the current document; the SEED document on first access  │
//! │  write()  ──► replace the WHOLE document, then publish one signal      │
//! │                                                                         │
//! │  • No partial updates, no per-entity endpoints                         │
//! │  • No validation: any well-formed AppState is accepted                 │
//! │  • No compare-and-swap: concurrent writers are last-writer-wins        │
//! │  • The write is durable BEFORE the change signal goes out, so a        │
//! │    listener that re-reads on the signal always sees the new document   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use fluxo_core::AppState;

use crate::bus::ChangeListener;
use crate::error::StoreResult;

/// A place the shared document lives. Instances hold it as
/// `Arc<dyn DocumentStore>` so backends are swappable under the controller.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads the whole document, seeding it on first access.
    async fn read(&self) -> StoreResult<AppState>;

    /// Replaces the whole document and signals every subscriber, the
    /// writer included.
    async fn write(&self, next: &AppState) -> StoreResult<()>;

    /// Opens a change listener covering writes from this point on.
    fn subscribe(&self) -> ChangeListener;
}
