//! Response construction and error mapping.
//!
//! # Responsibilities
//! - Map service failures to HTTP status codes and JSON error bodies
//! - Attach advisory validation errors to write responses
//!
//! # Design Decisions
//! - Error bodies are `{code, message, data: {status}}`
//! - Advisory errors travel in `x-settings-error` headers so the body
//!   is always the settings document

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::sanitize::ValidationError;
use crate::service::{ServiceError, WriteOutcome};

pub const X_SETTINGS_ERROR: HeaderName = HeaderName::from_static("x-settings-error");

/// An error returned to the HTTP client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    data: ErrorData,
}

#[derive(Serialize)]
struct ErrorData {
    status: u16,
}

impl ApiError {
    pub fn invalid_json(err: &serde_json::Error) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_json",
            message: format!("Invalid JSON body: {}", err),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let (status, code) = match err {
            ServiceError::Unauthorized => (StatusCode::UNAUTHORIZED, "rest_forbidden"),
            ServiceError::StorageUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable")
            }
        };
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            message: &self.message,
            data: ErrorData {
                status: self.status.as_u16(),
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Validated document as the body, one header per advisory error.
pub fn write_response(outcome: WriteOutcome) -> Response {
    let mut response = Json(outcome.document).into_response();
    let headers = response.headers_mut();
    for value in outcome.errors.iter().filter_map(error_header) {
        headers.append(X_SETTINGS_ERROR, value);
    }
    response
}

fn error_header(error: &ValidationError) -> Option<HeaderValue> {
    HeaderValue::from_str(&error.to_string()).ok()
}
