//! JSON file storage.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::document::ConfigDocument;
use crate::storage::{SettingsStore, StorageError};

/// Stores the record as `<directory>/<record_name>.json`.
///
/// Saves write a sibling temp file and rename it over the record, so a
/// reader never sees a half-written file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(directory: impl AsRef<Path>, record_name: &str) -> Self {
        Self {
            path: directory.as_ref().join(format!("{}.json", record_name)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A sibling temp file unique to one save, so concurrent saves never
    /// rename each other's data.
    fn temp_path(&self) -> PathBuf {
        self.path
            .with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl SettingsStore for FileStore {
    async fn load(&self) -> Result<Option<serde_json::Value>, StorageError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_slice(&content)?;
        tracing::debug!(path = %self.path.display(), "Loaded settings record");
        Ok(Some(value))
    }

    async fn save(&self, document: &ConfigDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(document)?;
        let temp = self.temp_path();

        let written = match tokio::fs::write(&temp, bytes).await {
            Ok(()) => tokio::fs::rename(&temp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            tracing::warn!(path = %temp.display(), error = %e, "Save failed, removing temp file");
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), "Saved settings record");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
