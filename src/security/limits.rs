//! Request body limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size
//!
//! # Design Decisions
//! - Limit checked while the body streams in (early rejection)
//! - Oversized bodies get 413 Payload Too Large
//! - axum's own 2 MB extractor default is replaced by the configured limit

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

pub fn with_body_limit(router: Router, max_body_size: usize) -> Router {
    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
}
