//! Keyed local state storage.
//!
//! The engine persists its state as a small number of named blobs
//! (`notifications.json`, `notification_rules.json`). [`StateStoreAsync`]
//! abstracts over where those blobs live so the domain layer can be tested
//! against an in-memory store; [`FilesystemStateStore`] is the production
//! implementation, writing one file per key under the application data
//! directory.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::StorageConfig;
use crate::error::{CoreError, StateError};
use crate::utils;
use crate::utils::paths::get_app_data_dir;

/// Async access to named state blobs.
///
/// Keys are logical file names without path separators. Reading a key that
/// has never been written yields [`StateError::NotFound`] wrapped in
/// [`CoreError::State`]; callers detect it via
/// [`CoreError::is_state_not_found`] and fall back to their defaults.
#[async_trait]
pub trait StateStoreAsync: Send + Sync {
    /// Reads the blob stored under `key`.
    async fn read_state_string(&self, key: &str) -> Result<String, CoreError>;

    /// Writes (or replaces) the blob stored under `key`.
    async fn write_state_string(&self, key: &str, content: String) -> Result<(), CoreError>;
}

/// Filesystem-backed state store: one file per key under a root directory.
pub struct FilesystemStateStore {
    root: PathBuf,
}

impl FilesystemStateStore {
    /// Creates a store rooted at `root`, creating the directory if needed.
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        utils::fs::ensure_dir_exists(&root)?;
        Ok(Self { root })
    }

    /// Creates a store rooted at the configured data directory, falling back
    /// to the platform data dir when the configuration leaves it unset.
    pub fn from_config(config: &StorageConfig) -> Result<Self, CoreError> {
        let root = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => get_app_data_dir()?,
        };
        Self::new(root)
    }

    /// The directory holding the state files.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
        if key.is_empty() {
            return Err(CoreError::State(StateError::InvalidKey {
                key: key.to_string(),
                reason: "key must not be empty".to_string(),
            }));
        }
        if key.contains('/') || key.contains('\\') || key == "." || key == ".." {
            return Err(CoreError::State(StateError::InvalidKey {
                key: key.to_string(),
                reason: "key must be a plain file name".to_string(),
            }));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl StateStoreAsync for FilesystemStateStore {
    async fn read_state_string(&self, key: &str) -> Result<String, CoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(CoreError::State(StateError::NotFound {
                    key: key.to_string(),
                }))
            }
            Err(e) => Err(CoreError::State(StateError::ReadError {
                key: key.to_string(),
                source: e,
            })),
        }
    }

    async fn write_state_string(&self, key: &str, content: String) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, content).await.map_err(|e| {
            CoreError::State(StateError::WriteError {
                key: key.to_string(),
                source: e,
            })
        })
    }
}

/// In-memory state store for tests and ephemeral setups.
#[derive(Default)]
pub struct InMemoryStateStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStoreAsync for InMemoryStateStore {
    async fn read_state_string(&self, key: &str) -> Result<String, CoreError> {
        match self.entries.read().await.get(key) {
            Some(content) => Ok(content.clone()),
            None => Err(CoreError::State(StateError::NotFound {
                key: key.to_string(),
            })),
        }
    }

    async fn write_state_string(&self, key: &str, content: String) -> Result<(), CoreError> {
        self.entries.write().await.insert(key.to_string(), content);
        Ok(())
    }
}
