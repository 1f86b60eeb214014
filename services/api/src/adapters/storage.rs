//! services/api/src/adapters/storage.rs
//!
//! This module contains the file-backed state store adapter, the concrete
//! implementation of the `StateStore` port from the `core` crate. Each key is
//! mirrored into one JSON file under the configured state directory; writes
//! are last-writer-wins with no merge logic.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ancient_eats_core::ports::{StateStore, StorageError};
use async_trait::async_trait;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A state store adapter that keeps one file per key.
#[derive(Clone)]
pub struct FileStateStore {
    root: PathBuf,
}

impl FileStateStore {
    /// Creates a new `FileStateStore`, creating the state directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(Self { root })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Maps a storage key onto a safe file stem.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

async fn read_entry(path: &Path) -> Result<Option<String>, StorageError> {
    match tokio::fs::read_to_string(path).await {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::Backend(e.to_string())),
    }
}

//=========================================================================================
// `StateStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        read_entry(&self.entry_path(key)).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::write(self.entry_path(key), value)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Backend(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path()).unwrap();

        assert!(store.get("ancientEatsUser").await.unwrap().is_none());
        store.put("ancientEatsUser", "{\"id\":\"1\"}").await.unwrap();
        assert_eq!(
            store.get("ancientEatsUser").await.unwrap().as_deref(),
            Some("{\"id\":\"1\"}")
        );
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path()).unwrap();

        store.put("ancientEatsPurchases", "[]").await.unwrap();
        store.remove("ancientEatsPurchases").await.unwrap();
        store.remove("ancientEatsPurchases").await.unwrap();
        assert!(store.get("ancientEatsPurchases").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn keys_are_sanitized_into_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path()).unwrap();

        store.put("odd/key name", "x").await.unwrap();
        assert_eq!(store.get("odd/key name").await.unwrap().as_deref(), Some("x"));
        assert!(dir.path().join("odd_key_name.json").exists());
    }
}
