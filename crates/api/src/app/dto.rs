use serde::{Deserialize, Serialize};

use configserver_auth::SecurityContext;

use crate::app::services::ServiceInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub registry: RegistryInfo,
}

/// Registry location only; the registry credentials are never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryInfo {
    pub host: String,
    pub port: u16,
}

impl From<&ServiceInfo> for InfoResponse {
    fn from(info: &ServiceInfo) -> Self {
        Self {
            name: info.name.clone(),
            version: info.version.clone(),
            registry: RegistryInfo {
                host: info.registry_host.clone(),
                port: info.registry_port,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub request_id: String,
    pub principal: String,
    pub authorities: Vec<String>,
    pub zone: String,
}

impl From<&SecurityContext> for WhoAmIResponse {
    fn from(ctx: &SecurityContext) -> Self {
        Self {
            request_id: ctx.request_id().to_string(),
            principal: ctx.principal().name.clone(),
            authorities: ctx
                .principal()
                .authorities
                .iter()
                .map(|a| a.as_str().to_string())
                .collect(),
            zone: ctx.zone().to_string(),
        }
    }
}
