//! Read-through cache over the settings record.

use arc_swap::ArcSwapOption;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::document::ConfigDocument;
use crate::observability::metrics;
use crate::sanitize::validate;
use crate::schema::SchemaModel;
use crate::storage::{SettingsStore, StorageError};

/// Lifetime of a cache entry that is never invalidated.
pub const DEFAULT_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// A cached document and its expiry.
#[derive(Debug)]
pub struct CacheEntry {
    document: Arc<ConfigDocument>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(document: Arc<ConfigDocument>, ttl: Duration) -> Self {
        Self {
            document,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn document(&self) -> &Arc<ConfigDocument> {
        &self.document
    }
}

/// Holds at most one [`CacheEntry`] in front of a [`SettingsStore`].
///
/// Lookups are lock-free. Misses are single-flight: concurrent callers wait
/// for one storage fetch instead of racing their own. A fetch never replaces
/// an entry installed by `put` while it was in flight.
pub struct CacheStore {
    entry: ArcSwapOption<CacheEntry>,
    fill_lock: Mutex<()>,
    ttl: Duration,
    storage: Arc<dyn SettingsStore>,
    schema: Arc<SchemaModel>,
}

impl CacheStore {
    pub fn new(storage: Arc<dyn SettingsStore>, schema: Arc<SchemaModel>, ttl: Duration) -> Self {
        Self {
            entry: ArcSwapOption::from(None),
            fill_lock: Mutex::new(()),
            ttl,
            storage,
            schema,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached document, fetching from storage on a miss or expiry.
    ///
    /// Storage failures degrade to the all-defaults document, which is
    /// returned but not cached.
    pub async fn get(&self) -> Arc<ConfigDocument> {
        if let Some(doc) = self.fresh() {
            metrics::record_cache_lookup(true);
            tracing::debug!("Settings cache hit");
            return doc;
        }
        metrics::record_cache_lookup(false);

        let _fill = self.fill_lock.lock().await;
        // Another caller may have filled the cache while we waited.
        if let Some(doc) = self.fresh() {
            return doc;
        }

        let snapshot = self.entry.load_full();
        match self.fetch().await {
            Ok(document) => {
                let document = Arc::new(document);
                let entry = Arc::new(CacheEntry::new(document.clone(), self.ttl));
                let previous = self.entry.compare_and_swap(&snapshot, Some(entry));
                if !same_entry(&*previous, &snapshot) {
                    // A put() landed during the fetch; its value is newer.
                    if let Some(doc) = self.fresh() {
                        return doc;
                    }
                }
                document
            }
            Err(e) => {
                tracing::warn!(
                    storage = %self.storage.describe(),
                    error = %e,
                    "Settings storage unavailable, serving defaults"
                );
                Arc::new(self.schema.defaults())
            }
        }
    }

    /// Drop the current entry unconditionally.
    pub fn invalidate(&self) {
        self.entry.store(None);
        tracing::debug!("Settings cache invalidated");
    }

    /// Replace the entry with `document` and a fresh TTL.
    pub fn put(&self, document: ConfigDocument) -> Arc<ConfigDocument> {
        let document = Arc::new(document);
        self.entry
            .store(Some(Arc::new(CacheEntry::new(document.clone(), self.ttl))));
        document
    }

    fn fresh(&self) -> Option<Arc<ConfigDocument>> {
        let guard = self.entry.load();
        (*guard)
            .as_ref()
            .filter(|entry| !entry.is_expired(Instant::now()))
            .map(|entry| entry.document.clone())
    }

    async fn fetch(&self) -> Result<ConfigDocument, StorageError> {
        let raw = match self.storage.load().await {
            Ok(raw) => raw,
            Err(e) => {
                metrics::record_storage_fetch("error");
                return Err(e);
            }
        };

        let Some(raw) = raw else {
            metrics::record_storage_fetch("empty");
            tracing::info!(storage = %self.storage.describe(), "No stored settings, using defaults");
            return Ok(self.schema.defaults());
        };
        metrics::record_storage_fetch("found");

        // Stored records may predate the current schema.
        let outcome = validate(&raw, &self.schema.defaults(), &self.schema);
        for error in &outcome.errors {
            tracing::warn!(section = %error.section, field = %error.field, "Stored setting replaced during load");
        }
        tracing::info!(storage = %self.storage.describe(), "Settings loaded from storage");
        Ok(outcome.document)
    }
}

fn same_entry(a: &Option<Arc<CacheEntry>>, b: &Option<Arc<CacheEntry>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
