//! Atomic JSON file operations.
//!
//! Writes go to a temporary file in the same directory, are synced to disk
//! and then renamed over the target, so readers never see a partial file.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use vibecoder_core::{Result, VibeError};

/// A handle to a JSON file replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file. A missing or empty file is `Ok(None)`.
    pub async fn load(&self) -> Result<Option<T>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Saves `data` via temporary file, fsync and rename.
    pub async fn save(&self, data: &T) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| VibeError::io("path has no parent directory"))?;
        tokio::fs::create_dir_all(parent).await?;

        let json = serde_json::to_vec_pretty(data)?;
        let tmp_path = self.temp_path()?;

        let mut tmp_file = tokio::fs::File::create(&tmp_path).await?;
        tmp_file.write_all(&json).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    /// Deletes the file if it exists.
    pub async fn remove(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| VibeError::io("path has no file name"))?;
        Ok(self
            .path
            .with_file_name(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Vec<String>>::new(dir.path().join("nested/data.json"));

        assert!(file.load().await.unwrap().is_none());
        file.save(&vec!["a".to_string(), "b".to_string()]).await.unwrap();
        assert_eq!(file.load().await.unwrap().unwrap(), vec!["a", "b"]);
        assert!(!dir.path().join("nested/.data.json.tmp").exists());

        file.remove().await.unwrap();
        assert!(file.load().await.unwrap().is_none());
        file.remove().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = AtomicJsonFile::<Vec<String>>::new(path)
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, VibeError::Serialization { .. }));
    }
}
