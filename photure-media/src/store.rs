//! Filesystem blob storage
//!
//! One file per blob under a single root directory. Keys are assigned at
//! save time as `{uuid_v4}{original_extension}` and never reused; the
//! extension is cosmetic (it makes the upload directory browsable) while
//! the uuid guarantees uniqueness.

use photure_common::{Error, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Blob store rooted at one directory
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory if missing
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Resolve a key to its path, refusing anything that could escape
    /// the root directory
    fn blob_path(&self, storage_key: &str) -> Result<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains('/')
            || storage_key.contains('\\')
            || storage_key.contains("..")
        {
            return Err(Error::InvalidInput(format!(
                "Invalid storage key: {}",
                storage_key
            )));
        }
        Ok(self.root.join(storage_key))
    }

    /// Write a new blob, returning its assigned storage key
    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<String> {
        let extension = Path::new(filename)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let storage_key = format!("{}{}", Uuid::new_v4(), extension);

        let path = self.blob_path(&storage_key)?;
        tokio::fs::write(&path, data).await?;
        Ok(storage_key)
    }

    /// Read a blob's bytes, or `None` if the key does not resolve
    pub async fn read(&self, storage_key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(storage_key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a blob; returns whether the key resolved to anything
    pub async fn remove(&self, storage_key: &str) -> Result<bool> {
        let path = self.blob_path(storage_key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (tempfile::TempDir, BlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path());
        store.ensure_root().await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_save_read_remove_round_trip() {
        let (_dir, store) = temp_store().await;

        let key = store.save("cat.jpg", b"0123456789").await.unwrap();
        assert!(key.ends_with(".jpg"));

        let data = store.read(&key).await.unwrap();
        assert_eq!(data.as_deref(), Some(&b"0123456789"[..]));

        assert!(store.remove(&key).await.unwrap());
        assert!(store.read(&key).await.unwrap().is_none());
        // Second delete resolves to nothing instead of crashing
        assert!(!store.remove(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_keys_are_unique_per_save() {
        let (_dir, store) = temp_store().await;
        let first = store.save("a.png", b"one").await.unwrap();
        let second = store.save("a.png", b"two").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(store.read(&first).await.unwrap().unwrap(), b"one");
        assert_eq!(store.read(&second).await.unwrap().unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_extensionless_filename_gets_bare_key() {
        let (_dir, store) = temp_store().await;
        let key = store.save("noext", b"data").await.unwrap();
        assert!(!key.contains('.'));
    }

    #[tokio::test]
    async fn test_traversal_keys_rejected() {
        let (_dir, store) = temp_store().await;
        for key in ["../secret", "a/b", "a\\b", "..", ""] {
            assert!(
                matches!(store.read(key).await, Err(Error::InvalidInput(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }
}
