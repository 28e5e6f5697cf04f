//! Sync-level errors: everything a controller call can fail with, wrapping
//! the core and store error types so callers match on one enum.

use fluxo_core::CoreError;
use fluxo_store::StoreError;
use thiserror::Error;

/// Failures surfaced by the sync controller and its collaborators.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A business rule rejected the intent (guard or engine).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The document store failed to read or write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An intent arrived before the initial `load` completed.
    #[error("controller not loaded: call load() first")]
    NotLoaded,

    /// An intent needs an active session and there is none.
    #[error("no active session")]
    NoSession,

    /// Login rejected. Deliberately silent about WHICH part was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The instance config file could not be read or written.
    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The instance config file is not valid TOML for our schema.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The instance config failed validation after loading.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for Results with SyncError.
pub type SyncResult<T> = Result<T, SyncError>;
