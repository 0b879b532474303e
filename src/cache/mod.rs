//! Settings cache subsystem.
//!
//! # Data Flow
//! ```text
//! read:  CacheStore::get
//!            hit (unexpired)  → cached document
//!            miss / expired   → SettingsStore::load → normalize → install entry
//! write: ConfigService → invalidate → put(validated)
//! ```
//!
//! # Design Decisions
//! - Exactly one entry, swapped atomically (arc-swap); readers never block
//! - Misses are single-flight behind an async mutex
//! - Last put wins; no version token is kept

pub mod store;

pub use store::{CacheEntry, CacheStore, DEFAULT_TTL};
