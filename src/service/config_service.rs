//! Read and authorized-write orchestration over the cache and storage.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::cache::CacheStore;
use crate::document::ConfigDocument;
use crate::observability::metrics;
use crate::sanitize::{validate, ValidationError};
use crate::schema::SchemaModel;
use crate::storage::{SettingsStore, StorageError};

/// Failures that abort a write. Validation problems are never errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Sorry, you are not allowed to do that.")]
    Unauthorized,

    #[error("settings could not be saved: {0}")]
    StorageUnavailable(#[from] StorageError),
}

/// The validated document a write produced and the fields it had to repair.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub document: Arc<ConfigDocument>,
    pub errors: Vec<ValidationError>,
}

/// The single settings instance of the process.
pub struct ConfigService {
    schema: Arc<SchemaModel>,
    storage: Arc<dyn SettingsStore>,
    cache: CacheStore,
    /// Serializes writers so storage and cache see saves in the same order.
    write_lock: Mutex<()>,
}

impl ConfigService {
    pub fn new(schema: Arc<SchemaModel>, storage: Arc<dyn SettingsStore>, cache: CacheStore) -> Self {
        Self {
            schema,
            storage,
            cache,
            write_lock: Mutex::new(()),
        }
    }

    pub fn schema(&self) -> &SchemaModel {
        &self.schema
    }

    /// Current document. Never fails; storage trouble degrades to defaults.
    pub async fn read(&self) -> Arc<ConfigDocument> {
        self.cache.get().await
    }

    /// Validate `candidate` against the current document and persist it.
    ///
    /// The authorization decision belongs to the caller; nothing is read or
    /// written when `authorized` is false.
    pub async fn write(&self, candidate: &Value, authorized: bool) -> Result<WriteOutcome, ServiceError> {
        if !authorized {
            tracing::warn!("Settings write refused: caller not authorized");
            metrics::record_write("unauthorized");
            return Err(ServiceError::Unauthorized);
        }

        let _guard = self.write_lock.lock().await;
        let current = self.cache.get().await;
        let outcome = validate(candidate, &current, &self.schema);

        for error in &outcome.errors {
            tracing::warn!(
                section = %error.section,
                field = %error.field,
                "{}",
                error.message
            );
            metrics::record_validation_error(&error.section);
        }

        if let Err(e) = self.storage.save(&outcome.document).await {
            self.cache.invalidate();
            tracing::error!(
                storage = %self.storage.describe(),
                error = %e,
                "Failed to persist settings"
            );
            metrics::record_write("storage_error");
            return Err(e.into());
        }

        self.cache.invalidate();
        let document = self.cache.put(outcome.document);

        tracing::info!(
            fields = document.field_count(),
            repaired = outcome.errors.len(),
            "Settings saved"
        );
        metrics::record_write("ok");

        Ok(WriteOutcome {
            document,
            errors: outcome.errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_TTL;
    use crate::document::SettingValue;
    use crate::schema::builtin::plugin_schema;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn service_with(storage: Arc<dyn SettingsStore>) -> ConfigService {
        let schema = Arc::new(SchemaModel::builder(plugin_schema()).build().unwrap());
        let cache = CacheStore::new(storage.clone(), schema.clone(), DEFAULT_TTL);
        ConfigService::new(schema, storage, cache)
    }

    /// Store whose saves fail while `broken` is set.
    struct FlakyStore {
        inner: MemoryStore,
        broken: AtomicBool,
    }

    #[async_trait]
    impl SettingsStore for FlakyStore {
        async fn load(&self) -> Result<Option<Value>, StorageError> {
            self.inner.load().await
        }

        async fn save(&self, document: &ConfigDocument) -> Result<(), StorageError> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable("disk full".into()));
            }
            self.inner.save(document).await
        }

        fn describe(&self) -> String {
            "flaky".into()
        }
    }

    #[tokio::test]
    async fn test_read_without_record_is_defaults() {
        let service = service_with(Arc::new(MemoryStore::new()));
        let doc = service.read().await;
        assert_eq!(*doc, service.schema().defaults());
    }

    #[tokio::test]
    async fn test_write_persists_and_is_read_back() {
        let storage = Arc::new(MemoryStore::new());
        let service = service_with(storage.clone());

        let outcome = service
            .write(&json!({"general": {"site_name": "Blog"}}), true)
            .await
            .unwrap();
        assert!(outcome.errors.is_empty());
        assert_eq!(
            outcome.document.get("general", "site_name"),
            Some(&SettingValue::from("Blog"))
        );

        assert_eq!(service.read().await, outcome.document);
        let stored = storage.load().await.unwrap().unwrap();
        assert_eq!(stored["general"]["site_name"], "Blog");
        assert_eq!(stored["advanced"]["cache_duration"], 60);
    }

    #[tokio::test]
    async fn test_unauthorized_write_changes_nothing() {
        let storage = Arc::new(MemoryStore::new());
        let service = service_with(storage.clone());
        let before = service.read().await;

        let result = service.write(&json!({"general": {"site_name": "Hacked"}}), false).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
        assert_eq!(service.read().await, before);
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejected_email_keeps_current_value() {
        let service = service_with(Arc::new(MemoryStore::new()));
        service
            .write(&json!({"general": {"email_id": "a@b.com"}}), true)
            .await
            .unwrap();

        let outcome = service
            .write(&json!({"general": {"email_id": "not-an-email"}}), true)
            .await
            .unwrap();
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].field, "email_id");
        assert_eq!(outcome.errors[0].section, "general");
        assert_eq!(
            outcome.document.get("general", "email_id"),
            Some(&SettingValue::from("a@b.com"))
        );
    }

    #[tokio::test]
    async fn test_storage_failure_fails_write_and_keeps_previous() {
        let storage = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            broken: AtomicBool::new(false),
        });
        let service = service_with(storage.clone());
        service
            .write(&json!({"general": {"site_name": "First"}}), true)
            .await
            .unwrap();

        storage.broken.store(true, Ordering::SeqCst);
        let result = service
            .write(&json!({"general": {"site_name": "Second"}}), true)
            .await;
        assert!(matches!(result, Err(ServiceError::StorageUnavailable(_))));

        let doc = service.read().await;
        assert_eq!(doc.get("general", "site_name"), Some(&SettingValue::from("First")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_leave_cache_matching_storage() {
        let storage = Arc::new(MemoryStore::new());
        let service = Arc::new(service_with(storage.clone()));

        let writes: Vec<_> = (0..16u64)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .write(&json!({"advanced": {"cache_duration": i}}), true)
                        .await
                        .map(|o| o.document)
                })
            })
            .collect();
        for write in writes {
            write.await.unwrap().unwrap();
        }

        let stored = storage.load().await.unwrap().unwrap();
        assert_eq!(stored, serde_json::to_value(&*service.read().await).unwrap());
    }
}
