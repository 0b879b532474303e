//! Durable storage for the settings record.
//!
//! # Data Flow
//! ```text
//! CacheStore miss  → SettingsStore::load  → untyped JSON record (or None)
//! ConfigService    → SettingsStore::save  → whole validated document
//! ```
//!
//! # Design Decisions
//! - One named record holds the whole document; no schema is stored
//! - Records load as untyped JSON so stale or hand-edited records can be
//!   normalized against the current schema before use
//! - Each save replaces the record atomically; there is no compare-and-set

pub mod file;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::document::ConfigDocument;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored record is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single mutable record in durable storage.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the record. `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<serde_json::Value>, StorageError>;

    /// Replace the record.
    async fn save(&self, document: &ConfigDocument) -> Result<(), StorageError>;

    /// Short label for logs.
    fn describe(&self) -> String;
}
