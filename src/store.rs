use bytes::Bytes;
use chrono::Utc;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::models::GeneratedArtifact;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create output directory: {0}")]
    CreateDirFailed(String),
    #[error("failed to write artifact: {0}")]
    WriteFailed(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("failed to read artifact: {0}")]
    ReadFailed(String),
}

/// Flat-directory store for generated logos. Files are named
/// `logo-<uuid>.png`; nothing is overwritten or deleted, and no manifest is
/// kept alongside the images.
pub struct ArtifactStore {
    output_dir: PathBuf,
}

impl ArtifactStore {
    /// Open the store, creating the output directory if it is missing.
    pub async fn new(output_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).await.map_err(|e| {
            StorageError::CreateDirFailed(format!("{}: {}", output_dir.display(), e))
        })?;
        Ok(ArtifactStore { output_dir })
    }

    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }

    fn filename(id: Uuid) -> String {
        format!("logo-{}.png", id)
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.output_dir.join(Self::filename(id))
    }

    /// Persist one generated image under a fresh uuid. The id is never
    /// reused; collision probability is treated as negligible.
    pub async fn store(&self, data: Bytes) -> Result<GeneratedArtifact, StorageError> {
        // Re-ensure the directory in case it was removed underneath us.
        fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            StorageError::CreateDirFailed(format!("{}: {}", self.output_dir.display(), e))
        })?;

        let id = Uuid::new_v4();
        let filename = Self::filename(id);
        let path = self.path_for(id);
        let size_bytes = data.len() as u64;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("{}: {}", path.display(), e))
        })?;
        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("{}: {}", path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("{}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Logo artifact written"
        );

        Ok(GeneratedArtifact {
            id,
            filename,
            path,
            size_bytes,
            created_at: Utc::now(),
        })
    }

    /// Read an artifact's raw bytes back for download.
    pub async fn load(&self, id: Uuid) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(id);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(Self::filename(id)));
        }
        fs::read(&path)
            .await
            .map_err(|e| StorageError::ReadFailed(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn store_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).await.unwrap();

        let data = Bytes::from_static(b"png bytes");
        let artifact = store.store(data.clone()).await.unwrap();

        assert_eq!(artifact.filename, format!("logo-{}.png", artifact.id));
        assert_eq!(artifact.size_bytes, data.len() as u64);
        assert!(artifact.path.exists());

        let loaded = store.load(artifact.id).await.unwrap();
        assert_eq!(loaded, data.as_ref());
    }

    #[tokio::test]
    async fn successive_stores_never_collide() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).await.unwrap();

        let first = store.store(Bytes::from_static(b"first")).await.unwrap();
        let second = store.store(Bytes::from_static(b"second")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(first.filename, second.filename);
        assert_eq!(store.load(first.id).await.unwrap(), b"first");
        assert_eq!(store.load(second.id).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn missing_output_dir_is_created() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("deeply").join("nested");
        let store = ArtifactStore::new(&nested).await.unwrap();
        assert!(nested.exists());

        let artifact = store.store(Bytes::from_static(b"data")).await.unwrap();
        assert!(artifact.path.starts_with(&nested));
    }

    #[tokio::test]
    async fn load_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).await.unwrap();
        let result = store.load(Uuid::new_v4()).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
