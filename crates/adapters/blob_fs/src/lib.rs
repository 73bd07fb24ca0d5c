//! # autohub-adapter-blob-fs
//!
//! Stores image blobs as plain files under a single root directory.
//!
//! ## Dependency rule
//! Depends on `autohub-app` (for the `BlobStore` port) and `autohub-domain`.

mod error;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use autohub_app::ports::BlobStore;
use autohub_domain::error::AutoHubError;

pub use error::BlobError;

/// Filesystem-backed [`BlobStore`].
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open the store, creating `root` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Io`] if the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::debug!(root = %root.display(), "blob store ready");
        Ok(Self { root })
    }

    /// Directory holding every blob.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` to a path inside the root.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::InvalidName`] for names that are empty, contain a
    /// path separator or point outside the root.
    pub fn path_of(&self, name: &str) -> Result<PathBuf, BlobError> {
        let invalid = name.is_empty()
            || name == "."
            || name.contains("..")
            || name.contains(['/', '\\', '\0']);
        if invalid {
            return Err(BlobError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl BlobStore for FsBlobStore {
    async fn write(&self, name: &str, content: &[u8]) -> Result<(), AutoHubError> {
        let path = self.path_of(name)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(BlobError::from)?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, AutoHubError> {
        let path = self.path_of(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(BlobError::from(err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (FsBlobStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path().join("images")).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn should_create_root_when_missing() {
        let (store, _dir) = store().await;
        assert!(store.root().is_dir());
    }

    #[tokio::test]
    async fn should_write_blob_under_root() {
        let (store, _dir) = store().await;

        store.write("abc.png", b"payload").await.unwrap();

        let written = std::fs::read(store.root().join("abc.png")).unwrap();
        assert_eq!(written, b"payload");
    }

    #[tokio::test]
    async fn should_delete_existing_blob() {
        let (store, _dir) = store().await;
        store.write("abc.png", b"payload").await.unwrap();

        assert!(store.delete("abc.png").await.unwrap());
        assert!(!store.root().join("abc.png").exists());
    }

    #[tokio::test]
    async fn should_report_false_when_deleting_missing_blob() {
        let (store, _dir) = store().await;
        assert!(!store.delete("missing.png").await.unwrap());
    }

    #[tokio::test]
    async fn should_reject_names_escaping_root() {
        let (store, _dir) = store().await;

        for name in ["", ".", "../x.png", "a/b.png", "a\\b.png", ".."] {
            let result = store.write(name, b"x").await;
            assert!(
                matches!(result, Err(AutoHubError::Blob(_))),
                "{name:?} accepted"
            );
        }
    }

    #[tokio::test]
    async fn should_overwrite_blob_with_same_name() {
        let (store, _dir) = store().await;
        store.write("a.gif", b"one").await.unwrap();
        store.write("a.gif", b"two").await.unwrap();
        assert_eq!(std::fs::read(store.path_of("a.gif").unwrap()).unwrap(), b"two");
    }
}
