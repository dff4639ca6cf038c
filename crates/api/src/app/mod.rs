//! HTTP application wiring (Axum router + gateway layer).
//!
//! Layout:
//! - `services.rs`: collaborators shared by handlers (config provider, service info)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response DTOs
//! - `errors.rs`: problem responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use configserver_auth::{ConfigurationError, SecurityGateway};
use configserver_core::Settings;

use crate::middleware::{self, GatewayState};
use crate::problem::ProblemSupport;
use crate::provider::ConfigProvider;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("security configuration rejected: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("{endpoint} endpoint must be a literal path, got `{path}`")]
    InvalidEndpoint { endpoint: &'static str, path: String },
}

/// Build the full HTTP router serving the property sources from `settings`.
pub fn build_app(settings: &Settings) -> Result<Router, StartupError> {
    let services = services::AppServices::in_memory(settings);
    assemble(settings, services)
}

/// Same as [`build_app`] with a caller-supplied configuration backend.
pub fn build_app_with(settings: &Settings, provider: Arc<dyn ConfigProvider>) -> Result<Router, StartupError> {
    assemble(settings, services::AppServices::new(settings, provider))
}

fn assemble(settings: &Settings, services: services::AppServices) -> Result<Router, StartupError> {
    let props = &settings.application;

    let gateway = SecurityGateway::from_properties(props)?;
    gateway.log_zones();

    let state = GatewayState {
        gateway: Arc::new(gateway),
        problems: Arc::new(ProblemSupport::new(&props.default_security.realm)),
    };

    let actuator = routes::ActuatorPaths {
        health: literal_path("health", &props.actuator_security.health_pattern)?,
        info: literal_path("info", &props.actuator_security.info_pattern)?,
    };

    // Gateway goes on last so it also guards the fallback.
    Ok(routes::router(&actuator)
        .layer(Extension(Arc::new(services)))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn_with_state(
            state,
            middleware::security_gateway,
        ))))
}

fn literal_path(endpoint: &'static str, path: &str) -> Result<String, StartupError> {
    if !path.starts_with('/') || path.contains(['*', '?', ':', '{', '}']) {
        return Err(StartupError::InvalidEndpoint {
            endpoint,
            path: path.to_string(),
        });
    }
    Ok(path.to_string())
}
