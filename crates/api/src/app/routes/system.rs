use std::sync::Arc;

use axum::{extract::Extension, http::Uri, response::IntoResponse, Json};

use configserver_auth::SecurityContext;

use crate::app::dto::{HealthResponse, InfoResponse, WhoAmIResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::up())
}

pub async fn info(Extension(services): Extension<Arc<AppServices>>) -> Json<InfoResponse> {
    Json(InfoResponse::from(&services.info))
}

pub async fn whoami(Extension(ctx): Extension<SecurityContext>) -> impl IntoResponse {
    Json(WhoAmIResponse::from(&ctx))
}

/// Unknown routes. Only reached after the gateway has authenticated the caller.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
