//! Service configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or $SETTINGS_MANAGER_CONFIG
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → consumed once by lifecycle::startup
//! ```
//!
//! # Design Decisions
//! - This is the process configuration, not the managed settings document
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError, CONFIG_ENV};
pub use schema::{
    AdminConfig, CacheConfig, ListenerConfig, LogFormat, ObservabilityConfig, SchemaConfig,
    SecurityConfig, ServerConfig, StorageBackend, StorageConfig, TimeoutConfig,
};
pub use validation::{validate_config, ConfigIssue};
