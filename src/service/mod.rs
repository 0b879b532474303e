//! Settings service.
//!
//! # Data Flow
//! ```text
//! read:   ConfigService::read → CacheStore::get
//! write:  authorization check
//!         → CacheStore::get (current)
//!         → sanitize::validate (pure)
//!         → SettingsStore::save
//!         → CacheStore::invalidate + put
//! ```
//!
//! # Design Decisions
//! - One instance per process, built at startup and passed to handlers
//! - Validation completes in memory before any durable write
//! - A failed save invalidates the cache instead of installing the
//!   unsaved document
//! - Concurrent writes are last-writer-wins

pub mod config_service;

pub use config_service::{ConfigService, ServiceError, WriteOutcome};
