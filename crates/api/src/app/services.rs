//! Downstream collaborators shared by the handlers.

use std::sync::Arc;

use configserver_core::Settings;

use crate::provider::{ConfigProvider, InMemoryConfigProvider};

/// Static facts reported by the info endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub registry_host: String,
    pub registry_port: u16,
}

#[derive(Clone)]
pub struct AppServices {
    pub provider: Arc<dyn ConfigProvider>,
    pub info: ServiceInfo,
}

impl AppServices {
    pub fn new(settings: &Settings, provider: Arc<dyn ConfigProvider>) -> Self {
        let registry = &settings.application.registry;
        Self {
            provider,
            info: ServiceInfo {
                name: settings.server.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                registry_host: registry.host.clone(),
                registry_port: registry.port,
            },
        }
    }

    /// Serve the property sources declared in the settings file.
    pub fn in_memory(settings: &Settings) -> Self {
        let provider = InMemoryConfigProvider::new(settings.property_sources.clone());
        Self::new(settings, Arc::new(provider))
    }
}
