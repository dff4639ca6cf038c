use axum::{routing::get, Router};

pub mod environment;
pub mod system;

/// Mount paths for the actuator endpoints (taken from settings).
#[derive(Debug, Clone)]
pub struct ActuatorPaths {
    pub health: String,
    pub info: String,
}

/// Router for every endpoint. All of them sit behind the security gateway.
pub fn router(actuator: &ActuatorPaths) -> Router {
    Router::new()
        .route(&actuator.health, get(system::health))
        .route(&actuator.info, get(system::info))
        .route("/whoami", get(system::whoami))
        .route("/internal/whoami", get(system::whoami))
        .route("/:application/:profiles", get(environment::find))
        .route("/:application/:profiles/:label", get(environment::find_labelled))
        .fallback(system::not_found)
}
