use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::document::ConfigDocument;
use crate::http::auth::is_authorized;
use crate::http::response::{write_response, ApiError};
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /settings`. Open to everyone.
pub async fn get_settings(State(state): State<AppState>) -> Json<Arc<ConfigDocument>> {
    Json(state.service.read().await)
}

/// `POST /settings`. Authorization is decided before the body is parsed.
pub async fn post_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let authorized = is_authorized(&headers, &state.api_key);

    let candidate = if authorized {
        parse_candidate(&body)?
    } else {
        Value::Null
    };

    let outcome = state.service.write(&candidate, authorized).await?;
    Ok(write_response(outcome))
}

pub async fn get_schema(State(state): State<AppState>) -> Response {
    Json(state.service.schema().to_json()).into_response()
}

/// An empty body is an empty submission, not a syntax error.
fn parse_candidate(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::invalid_json(&e))
}
