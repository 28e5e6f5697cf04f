//! # Fluxo Store
//!
//! Persistence and change notification for the shared Fluxo document.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          fluxo-store                                    │
//! │                                                                         │
//! │  document     - DocumentStore trait (whole-document read/write)        │
//! │  memory       - MemoryStore: RwLock-backed, for tests & in-process     │
//! │  file         - JsonFileStore: one JSON file, temp-file + rename       │
//! │  bus          - ChangeBus / ChangeListener (content-free signals)      │
//! │  error        - StoreError / StoreResult                               │
//! │                                                                         │
//! │  The store validates NOTHING and merges NOTHING: it persists the       │
//! │  document it is given and tells subscribers something changed.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bus;
pub mod document;
pub mod error;
pub mod file;
pub mod memory;

pub use bus::{ChangeBus, ChangeListener};
pub use document::DocumentStore;
pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
