//! # Instance Configuration
//!
//! Identity and storage settings for one running instance.
//!
//! ## Load Order
//! ```text
//! defaults ──► TOML file (platform config dir) ──► FLUXO_* env ──► validate
//! ```
//!
//! Env variables: `FLUXO_INSTANCE_ID`, `FLUXO_INSTANCE_NAME`,
//! `FLUXO_STORE_PATH`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use fluxo_store::{DocumentStore, JsonFileStore, MemoryStore};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{SyncError, SyncResult};

/// Top-level instance config, mirrored 1:1 in the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    pub instance: InstanceSection,
    pub store: StoreSection,
}

/// `[instance]` section: who this terminal is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceSection {
    /// Stable identifier, generated once per install by default.
    pub id: String,
    /// Human label shown in logs.
    pub name: String,
}

/// `[store]` section: where the shared document lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Document file path. `None` keeps the document in memory only.
    pub path: Option<PathBuf>,
}

impl Default for InstanceSection {
    fn default() -> Self {
        InstanceSection {
            id: Uuid::new_v4().to_string(),
            name: "caixa".to_string(),
        }
    }
}

impl Default for InstanceConfig {
    fn default() -> Self {
        InstanceConfig {
            instance: InstanceSection::default(),
            store: StoreSection::default(),
        }
    }
}

impl InstanceConfig {
    /// Platform config file location (`…/fluxo/instance.toml`), when the
    /// platform exposes a config directory at all.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "fluxo").map(|dirs| dirs.config_dir().join("instance.toml"))
    }

    /// Full load order: defaults, then the default file if present, then
    /// env overrides, then validation.
    pub fn load() -> SyncResult<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => InstanceConfig::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parses one TOML file, without env overrides or validation.
    pub fn from_file(path: &Path) -> SyncResult<Self> {
        debug!(path = %path.display(), "loading instance config");
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Applies `FLUXO_*` environment overrides on top of whatever was
    /// loaded.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("FLUXO_INSTANCE_ID") {
            self.instance.id = id;
        }
        if let Ok(name) = std::env::var("FLUXO_INSTANCE_NAME") {
            self.instance.name = name;
        }
        if let Ok(path) = std::env::var("FLUXO_STORE_PATH") {
            self.store.path = Some(PathBuf::from(path));
        }
    }

    /// Rejects configs no controller could run with.
    pub fn validate(&self) -> SyncResult<()> {
        if self.instance.id.trim().is_empty() {
            return Err(SyncError::InvalidConfig(
                "instance.id must not be empty".to_string(),
            ));
        }
        if self.instance.name.trim().is_empty() {
            return Err(SyncError::InvalidConfig(
                "instance.name must not be empty".to_string(),
            ));
        }
        if let Some(path) = &self.store.path {
            if path.as_os_str().is_empty() {
                return Err(SyncError::InvalidConfig(
                    "store.path must not be empty when set".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Opens the store this config names: a JSON file when a path is set,
    /// the in-memory store otherwise.
    pub fn open_store(&self) -> Arc<dyn DocumentStore> {
        match &self.store.path {
            Some(path) => Arc::new(JsonFileStore::new(path.clone())),
            None => Arc::new(MemoryStore::new()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_defaults_are_valid() {
        let config = InstanceConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.instance.id.is_empty());
        assert_eq!(config.instance.name, "caixa");
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_from_file_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[instance]
name = "balcao-2"

[store]
path = "/var/lib/fluxo/ledger.json"
"#
        )
        .unwrap();

        // Omitted fields fall back to defaults (the id is generated).
        let config = InstanceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.instance.name, "balcao-2");
        assert!(!config.instance.id.is_empty());
        assert_eq!(
            config.store.path.as_deref(),
            Some(Path::new("/var/lib/fluxo/ledger.json"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[[").unwrap();
        let err = InstanceConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SyncError::ConfigParse(_)));
    }

    #[test]
    fn test_validation_rejects_blank_identity() {
        let mut config = InstanceConfig::default();
        config.instance.id = "  ".into();
        assert!(matches!(
            config.validate().unwrap_err(),
            SyncError::InvalidConfig(_)
        ));
    }
}
