//! Store-level errors: I/O and serialization failures around the shared
//! document. Business failures never originate here; the store accepts any
//! well-formed document (validation is the engine's job).

use thiserror::Error;

/// Failures reading or writing the shared document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure in the JSON-file backend.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document could not be (de)serialized.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;
