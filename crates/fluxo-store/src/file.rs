//! JSON-file document store.
//!
//! One pretty-printed JSON value at a fixed path, replaced wholesale on
//! every write. The path is the store's identity: instances that share it
//! share the ledger.
//!
//! Writes go through a temp file in the same directory followed by a
//! rename, so a crash mid-write leaves the previous document intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fluxo_core::AppState;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::bus::{ChangeBus, ChangeListener};
use crate::document::DocumentStore;
use crate::error::StoreResult;

/// Whole-document store persisted as a single JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes writers; readers go straight to the filesystem.
    write_lock: Mutex<()>,
    bus: ChangeBus,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            write_lock: Mutex::new(()),
            bus: ChangeBus::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, state: &AppState) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(state)?;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn read(&self) -> StoreResult<AppState> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // First access: seed the file so every instance sharing the
                // path starts from the same document.
                let _guard = self.write_lock.lock().await;
                // Another instance may have seeded while we waited.
                match tokio::fs::read(&self.path).await {
                    Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        info!(path = %self.path.display(), "seeding document file");
                        let seed = AppState::seed();
                        self.persist(&seed).await?;
                        Ok(seed)
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, next: &AppState) -> StoreResult<()> {
        {
            let _guard = self.write_lock.lock().await;
            self.persist(next).await?;
            debug!(path = %self.path.display(), "document written");
        }
        // Durable before the signal: a re-read triggered by this cannot
        // see the old file.
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
