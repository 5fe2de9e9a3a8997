use crate::domain::ports::Storage;
use crate::utils::error::{PlannerError, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Stores each key as `<base_path>/<key>.json`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        Path::new(&self.base_path).join(format!("{}.json", key))
    }
}

impl Storage for LocalStorage {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let full_path = self.path_for(key);

        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PlannerError::StorageUnavailable {
                message: format!("cannot read {}: {}", full_path.display(), e),
            }),
        }
    }

    async fn save(&self, key: &str, data: &[u8]) -> Result<()> {
        let full_path = self.path_for(key);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PlannerError::StorageUnavailable {
                    message: format!("cannot create {}: {}", parent.display(), e),
                })?;
        }

        tokio::fs::write(&full_path, data)
            .await
            .map_err(|e| PlannerError::StorageUnavailable {
                message: format!("cannot write {}: {}", full_path.display(), e),
            })?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

/// Process-local store; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.entries.lock().await;
        entries.get(key).cloned()
    }

    pub async fn insert(&self, key: &str, data: impl Into<Vec<u8>>) {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), data.into());
    }
}

impl Storage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(key).await)
    }

    async fn save(&self, key: &str, data: &[u8]) -> Result<()> {
        self.insert(key, data).await;
        Ok(())
    }
}

/// Headless mode: there is no persistence medium at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedStorage;

impl Storage for DetachedStorage {
    async fn load(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(PlannerError::StorageUnavailable {
            message: "running without storage".to_string(),
        })
    }

    async fn save(&self, _key: &str, _data: &[u8]) -> Result<()> {
        Err(PlannerError::StorageUnavailable {
            message: "running without storage".to_string(),
        })
    }
}
