//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → handlers.rs
//!         GET  /settings         → ConfigService::read
//!         POST /settings         → auth.rs → ConfigService::write
//!         GET  /settings/schema  → SchemaModel::to_json
//!         GET  /health
//!     → response.rs (error mapping, advisory error headers)
//!     → Send to client
//! ```

pub mod auth;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, X_SETTINGS_ERROR};
pub use server::{AppState, HttpServer};
