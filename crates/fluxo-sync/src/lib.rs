//! # Fluxo Sync
//!
//! Per-instance synchronization for the shared Fluxo ledger.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          fluxo-sync                                     │
//! │                                                                         │
//! │  controller   - SyncController: snapshot, phases, submit pipeline      │
//! │  auth         - Authenticator trait + stored-credential impl           │
//! │  config       - InstanceConfig (TOML file + FLUXO_* env overrides)     │
//! │  error        - SyncError / SyncResult                                 │
//! │                                                                         │
//! │  caixa-1 ──┐                                                            │
//! │  caixa-2 ──┼── Arc<dyn DocumentStore> ── one shared document           │
//! │  escritorio┘         (fluxo-store)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;

pub use auth::{Authenticator, StoredCredentialAuthenticator};
pub use config::InstanceConfig;
pub use controller::{Phase, SyncController};
pub use error::{SyncError, SyncResult};
