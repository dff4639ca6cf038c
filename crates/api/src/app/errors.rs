//! The single error-body formatter for the whole API.
//!
//! Security denials, unknown routes, bad path parameters and provider
//! failures all render through [`problem`], so every error has the same
//! shape regardless of where it came from.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::provider::ProviderError;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Error body: `{ status, title, detail, instance, timestamp }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub status: u16,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Problem {
    pub fn new(status: StatusCode, detail: impl Into<String>, instance: Option<&str>) -> Self {
        Self {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            detail: detail.into(),
            instance: instance.map(str::to_string),
            timestamp: Utc::now(),
        }
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_CONTENT_TYPE))],
            Json(self),
        )
            .into_response()
    }
}

pub fn problem(status: StatusCode, detail: impl Into<String>, instance: Option<&str>) -> Response {
    Problem::new(status, detail, instance).into_response()
}

/// Non-security failures raised by handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no handler for {0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Provider(ProviderError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::Provider(ProviderError::Backend(_)) => StatusCode::BAD_GATEWAY,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        problem(status, self.to_string(), None)
    }
}
