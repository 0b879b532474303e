//! In-process storage, for ephemeral deployments and tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::ConfigDocument;
use crate::storage::{SettingsStore, StorageError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    record: RwLock<Option<serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing (possibly partial) record.
    pub fn with_record(record: serde_json::Value) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<Option<serde_json::Value>, StorageError> {
        Ok(self.record.read().await.clone())
    }

    async fn save(&self, document: &ConfigDocument) -> Result<(), StorageError> {
        let value = serde_json::to_value(document)?;
        *self.record.write().await = Some(value);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
