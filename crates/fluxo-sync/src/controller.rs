//! # Sync Controller
//!
//! The per-instance loop: a local snapshot, the shared store, and the
//! change signals that keep them in step.
//!
//! ## Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SyncController Phases                              │
//! │                                                                         │
//! │        new()            load()                                          │
//! │  ──────────► Loading ──────────► Ready ◄─────────┐                     │
//! │                                    │             │                      │
//! │                                    │ refresh /   │ done                 │
//! │                                    │ submit      │                      │
//! │                                    ▼             │                      │
//! │                                 Syncing ─────────┘                     │
//! │                                                                         │
//! │  Intents in Loading fail with NotLoaded. A failed refresh or submit    │
//! │  returns to Ready with the previous snapshot intact.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submit Pipeline
//! ```text
//! intent ─► guard (session role) ─► engine (local snapshot) ─► write ─► adopt
//! ```
//! One guard check, one pure transition, one whole-document write. On any
//! error the local snapshot is exactly what it was before the call.

use std::sync::Arc;

use fluxo_core::engine::{self, Intent};
use fluxo_core::types::User;
use fluxo_core::{ensure_can_perform, AppState};
use fluxo_store::{ChangeListener, DocumentStore};
use tracing::{debug, info};

use crate::auth::Authenticator;
use crate::error::{SyncError, SyncResult};

/// Where a controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed but not yet loaded; intents are rejected.
    Loading,
    /// Snapshot in hand, accepting intents.
    Ready,
    /// A store round-trip is in flight.
    Syncing,
}

/// One instance's view of the shared ledger.
pub struct SyncController {
    store: Arc<dyn DocumentStore>,
    listener: ChangeListener,
    snapshot: Option<AppState>,
    phase: Phase,
    /// Human label for log lines; typically the configured instance name.
    instance: String,
}

impl SyncController {
    /// Subscribes to the store's bus immediately so no write between
    /// construction and `load` goes unnoticed.
    pub fn new(store: Arc<dyn DocumentStore>, instance: impl Into<String>) -> Self {
        let listener = store.subscribe();
        SyncController {
            store,
            listener,
            snapshot: None,
            phase: Phase::Loading,
            instance: instance.into(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The local snapshot. `NotLoaded` before the first `load`.
    pub fn state(&self) -> SyncResult<&AppState> {
        self.snapshot.as_ref().ok_or(SyncError::NotLoaded)
    }

    /// The active session's user, if signed in.
    pub fn current_user(&self) -> Option<&User> {
        self.snapshot.as_ref()?.current_user.as_ref()
    }

    /// Initial read: `Loading → Ready`. The stored document is adopted
    /// wholesale, including any persisted session.
    pub async fn load(&mut self) -> SyncResult<()> {
        let state = self.store.read().await?;
        info!(instance = %self.instance, "document loaded");
        self.snapshot = Some(state);
        self.phase = Phase::Ready;
        Ok(())
    }

    /// Waits until the store signals a change. Resolves spuriously at most
    /// into an extra refresh, which is idempotent.
    pub async fn changed(&mut self) -> bool {
        self.listener.changed().await
    }

    /// Re-reads the store and adopts the fresh document, keeping only the
    /// local session pointer (`AppState::adopt_remote`).
    pub async fn refresh(&mut self) -> SyncResult<()> {
        let local = self.snapshot.take().ok_or(SyncError::NotLoaded)?;
        self.phase = Phase::Syncing;
        match self.store.read().await {
            Ok(remote) => {
                debug!(instance = %self.instance, "refreshed from store");
                self.snapshot = Some(local.adopt_remote(remote));
                self.phase = Phase::Ready;
                Ok(())
            }
            Err(e) => {
                // Keep the stale snapshot; stale beats none.
                self.snapshot = Some(local);
                self.phase = Phase::Ready;
                Err(e.into())
            }
        }
    }

    /// Runs one intent end to end: guard, engine, single write, adopt.
    ///
    /// Errors propagate unchanged and leave the local snapshot untouched.
    pub async fn submit(&mut self, intent: &Intent) -> SyncResult<()> {
        let snapshot = self.snapshot.as_ref().ok_or(SyncError::NotLoaded)?;
        let actor = snapshot
            .current_user
            .clone()
            .ok_or(SyncError::NoSession)?;

        ensure_can_perform(actor.role, intent.operation_kind())?;
        let next = intent.apply(snapshot, &actor)?;

        self.phase = Phase::Syncing;
        match self.store.write(&next).await {
            Ok(()) => {
                debug!(
                    instance = %self.instance,
                    actor = %actor.id,
                    op = ?intent.operation_kind(),
                    "intent committed"
                );
                self.snapshot = Some(next);
                self.phase = Phase::Ready;
                Ok(())
            }
            Err(e) => {
                self.phase = Phase::Ready;
                Err(e.into())
            }
        }
    }

    /// Checks credentials through the collaborator, then commits the
    /// session pointer through the store like any other transition.
    pub async fn sign_in(
        &mut self,
        authenticator: &dyn Authenticator,
        login_name: &str,
        secret: &str,
    ) -> SyncResult<User> {
        let snapshot = self.snapshot.as_ref().ok_or(SyncError::NotLoaded)?;
        let user = authenticator.authenticate(snapshot, login_name, secret)?;
        let next = engine::sign_in(snapshot, &user.id)?;
        self.store.write(&next).await?;
        info!(instance = %self.instance, user = %user.id, "signed in");
        self.snapshot = Some(next);
        Ok(user)
    }

    /// Clears the session pointer and commits the cleared document.
    pub async fn sign_out(&mut self) -> SyncResult<()> {
        let snapshot = self.snapshot.as_ref().ok_or(SyncError::NotLoaded)?;
        let next = engine::sign_out(snapshot);
        self.store.write(&next).await?;
        info!(instance = %self.instance, "signed out");
        self.snapshot = Some(next);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
