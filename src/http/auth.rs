//! Write authorization.
//!
//! The HTTP layer decides whether a caller may write; the service only
//! receives the resulting flag.

use axum::http::{header, HeaderMap};

/// True when the `Authorization` header carries `Bearer <api_key>`.
///
/// An empty key authorizes nobody.
pub fn is_authorized(headers: &HeaderMap, api_key: &str) -> bool {
    if api_key.is_empty() {
        return false;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == api_key)
}
