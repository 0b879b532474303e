//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the schema (JSON file or builtin)
//! - Open the configured storage backend
//! - Wire cache and service together
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::cache::CacheStore;
use crate::config::{ServerConfig, StorageBackend};
use crate::sanitize::SanitizerRegistry;
use crate::schema::{builtin, ObjectNode, SchemaError, SchemaModel};
use crate::service::ConfigService;
use crate::storage::{FileStore, MemoryStore, SettingsStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build settings schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Schema from `schema.path` when set, else the builtin plugin schema.
pub fn load_schema(config: &ServerConfig) -> Result<SchemaModel, SchemaError> {
    let base: ObjectNode = match &config.schema.path {
        Some(path) => {
            let registry = SanitizerRegistry::with_builtins();
            let base = SchemaModel::load_file(Path::new(path), &registry)?;
            tracing::info!(path = %path, "Loaded settings schema from file");
            base
        }
        None => builtin::plugin_schema(),
    };
    SchemaModel::builder(base).build()
}

pub fn open_storage(config: &ServerConfig) -> Arc<dyn SettingsStore> {
    match config.storage.backend {
        StorageBackend::File => Arc::new(FileStore::new(
            &config.storage.directory,
            &config.storage.record_name,
        )),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    }
}

/// Build the process-wide settings service.
pub fn build_service(config: &ServerConfig) -> Result<Arc<ConfigService>, StartupError> {
    let schema = Arc::new(load_schema(config)?);
    let storage = open_storage(config);
    let cache = CacheStore::new(
        storage.clone(),
        schema.clone(),
        Duration::from_secs(config.cache.ttl_secs),
    );

    tracing::info!(
        sections = schema.sections().count(),
        fields = schema.walk_fields().count(),
        storage = %storage.describe(),
        cache_ttl_secs = config.cache.ttl_secs,
        "Settings service initialized"
    );

    Ok(Arc::new(ConfigService::new(schema, storage, cache)))
}
