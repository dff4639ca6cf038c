//! Configuration-provider seam.
//!
//! Resolving property sheets from a backing store is the provider's job; the
//! API only authenticates access and renders the result. The in-memory
//! provider serves sheets declared in the settings file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use configserver_core::PropertySourceProperties;

/// Resolved configuration for one `(application, profiles, label)` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub name: String,
    pub profiles: Vec<String>,
    pub label: Option<String>,
    pub property_sources: Vec<PropertySource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySource {
    pub name: String,
    pub source: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("invalid configuration request: {0}")]
    InvalidRequest(String),

    #[error("configuration backend failed: {0}")]
    Backend(String),
}

pub trait ConfigProvider: Send + Sync {
    fn find(&self, application: &str, profiles: &[String], label: Option<&str>) -> Result<Environment, ProviderError>;
}

/// Application name whose sheets apply to every application.
const SHARED_APPLICATION: &str = "application";
const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigProvider {
    sources: Vec<PropertySourceProperties>,
}

impl InMemoryConfigProvider {
    pub fn new(sources: Vec<PropertySourceProperties>) -> Self {
        Self { sources }
    }

    /// Append sheets for one application/profile: label-specific sheets
    /// first, then unlabelled ones.
    fn collect(&self, application: &str, profile: &str, label: Option<&str>, out: &mut Vec<PropertySource>) {
        let candidates = || {
            self.sources
                .iter()
                .filter(move |s| s.application == application && s.profile == profile)
        };
        let labelled = candidates().filter(|s| label.is_some() && s.label.as_deref() == label);
        let unlabelled = candidates().filter(|s| s.label.is_none());

        for source in labelled.chain(unlabelled) {
            out.push(PropertySource {
                name: source
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{}-{}", source.application, source.profile)),
                source: source.properties.clone(),
            });
        }
    }
}

impl ConfigProvider for InMemoryConfigProvider {
    /// Sources are returned highest precedence first: later profiles before
    /// earlier ones, application-specific before shared, `default` last.
    fn find(&self, application: &str, profiles: &[String], label: Option<&str>) -> Result<Environment, ProviderError> {
        if application.trim().is_empty() {
            return Err(ProviderError::InvalidRequest("application name is empty".to_string()));
        }
        if profiles.is_empty() {
            return Err(ProviderError::InvalidRequest("at least one profile is required".to_string()));
        }

        let mut effective: Vec<&str> = profiles.iter().map(String::as_str).collect();
        if !effective.contains(&DEFAULT_PROFILE) {
            effective.insert(0, DEFAULT_PROFILE);
        }

        let mut property_sources = Vec::new();
        for profile in effective.iter().rev() {
            self.collect(application, profile, label, &mut property_sources);
            if application != SHARED_APPLICATION {
                self.collect(SHARED_APPLICATION, profile, label, &mut property_sources);
            }
        }

        Ok(Environment {
            name: application.to_string(),
            profiles: profiles.to_vec(),
            label: label.map(str::to_string),
            property_sources,
        })
    }
}

/// Split a comma-separated profile segment (`dev,cloud`).
pub fn parse_profiles(segment: &str) -> Vec<String> {
    segment
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(application: &str, profile: &str, label: Option<&str>, key: &str, value: i64) -> PropertySourceProperties {
        PropertySourceProperties {
            application: application.to_string(),
            profile: profile.to_string(),
            label: label.map(str::to_string),
            name: None,
            properties: BTreeMap::from([(key.to_string(), serde_json::json!(value))]),
        }
    }

    fn provider() -> InMemoryConfigProvider {
        InMemoryConfigProvider::new(vec![
            source("billing", "default", None, "pool", 5),
            source("billing", "prod", None, "pool", 20),
            source("billing", "cloud", None, "region", 1),
            source("application", "default", None, "timeout", 30),
            source("billing", "prod", Some("v2"), "pool", 40),
        ])
    }

    fn names(env: &Environment) -> Vec<&str> {
        env.property_sources.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn orders_sources_by_precedence() {
        let env = provider().find("billing", &parse_profiles("prod,cloud"), None).unwrap();
        assert_eq!(names(&env), ["billing-cloud", "billing-prod", "billing-default", "application-default"]);
        assert_eq!(env.profiles, ["prod", "cloud"]);
    }

    #[test]
    fn labelled_sources_only_served_for_that_label() {
        let env = provider().find("billing", &parse_profiles("prod"), Some("v2")).unwrap();
        assert_eq!(env.property_sources[0].source["pool"], 40);
        assert_eq!(env.property_sources[1].source["pool"], 20);

        let env = provider().find("billing", &parse_profiles("prod"), None).unwrap();
        assert_eq!(env.property_sources.len(), 3);
    }

    #[test]
    fn unknown_application_gets_shared_sources_only() {
        let env = provider().find("search", &parse_profiles("default"), None).unwrap();
        assert_eq!(names(&env), ["application-default"]);
    }

    #[test]
    fn empty_profiles_are_rejected() {
        let err = provider().find("billing", &parse_profiles(" , "), None).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let env = provider().find("billing", &parse_profiles("default"), None).unwrap();
        let json = serde_json::to_value(&env).unwrap();
        assert!(json.get("propertySources").is_some());
    }
}
