use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Extension, Path},
    Json,
};

use configserver_auth::SecurityContext;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::provider::{parse_profiles, Environment};

pub async fn find(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Environment>, ApiError> {
    let Path((application, profiles)) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    resolve(&services, &ctx, &application, &profiles, None)
}

pub async fn find_labelled(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    path: Result<Path<(String, String, String)>, PathRejection>,
) -> Result<Json<Environment>, ApiError> {
    let Path((application, profiles, label)) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    resolve(&services, &ctx, &application, &profiles, Some(&label))
}

fn resolve(
    services: &AppServices,
    ctx: &SecurityContext,
    application: &str,
    profiles: &str,
    label: Option<&str>,
) -> Result<Json<Environment>, ApiError> {
    let profiles = parse_profiles(profiles);
    let env = services.provider.find(application, &profiles, label)?;

    tracing::info!(
        request_id = %ctx.request_id(),
        principal = %ctx.principal().name,
        authenticated_at = %ctx.authenticated_at(),
        application,
        profiles = ?profiles,
        label = label.unwrap_or("-"),
        sources = env.property_sources.len(),
        "served configuration"
    );
    Ok(Json(env))
}
