//! Schema-driven settings manager library.

// Settings core
pub mod cache;
pub mod document;
pub mod sanitize;
pub mod schema;
pub mod service;
pub mod storage;

// Serving
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServerConfig;
pub use document::{ConfigDocument, SettingValue};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use schema::SchemaModel;
pub use service::ConfigService;
