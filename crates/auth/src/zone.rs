//! Authentication zones and the ordered zone table.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::error::ConfigurationError;
use crate::pattern::PathPattern;
use crate::principal::{Authority, Principal, Secret};

/// Identifier of a zone (e.g. `actuator`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneId(Cow<'static, str>);

impl ZoneId {
    /// Catch-all zone for every path no other zone claims.
    pub const DEFAULT: ZoneId = ZoneId(Cow::Borrowed("default"));
    /// Operational/health endpoints.
    pub const ACTUATOR: ZoneId = ZoneId(Cow::Borrowed("actuator"));
    /// Service-to-service endpoints.
    pub const INTERNAL: ZoneId = ZoneId(Cow::Borrowed("internal"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declarative description of one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneConfig {
    id: ZoneId,
    pattern: PathPattern,
    required_authority: Option<Authority>,
    default_authority: Option<Authority>,
}

impl ZoneConfig {
    pub fn new(id: ZoneId, pattern: &str) -> Result<Self, ConfigurationError> {
        Ok(Self {
            id,
            pattern: PathPattern::parse(pattern)?,
            required_authority: None,
            default_authority: None,
        })
    }

    /// Require `authority` for every request in this zone. Principals that
    /// omit an authority list are granted it by default.
    pub fn requiring(mut self, authority: Authority) -> Self {
        self.default_authority = Some(authority.clone());
        self.required_authority = Some(authority);
        self
    }

    pub fn id(&self) -> &ZoneId {
        &self.id
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn required_authority(&self) -> Option<&Authority> {
        self.required_authority.as_ref()
    }

    pub fn default_authority(&self) -> Option<&Authority> {
        self.default_authority.as_ref()
    }

    /// Build a principal for this zone, filling in the default authority when
    /// `authorities` is unspecified.
    pub fn principal(
        &self,
        name: &str,
        secret: &str,
        authorities: Option<&[String]>,
    ) -> Result<Principal, ConfigurationError> {
        if name.trim().is_empty() {
            return Err(ConfigurationError::MissingName { zone: self.id.clone() });
        }

        let authorities: Vec<Authority> = match authorities {
            Some(list) => list
                .iter()
                .filter(|a| !a.trim().is_empty())
                .map(|a| Authority::new(a.trim().to_string()))
                .collect(),
            None => self.default_authority.iter().cloned().collect(),
        };

        Principal::new(name, Secret::new(secret), authorities).ok_or_else(|| {
            ConfigurationError::EmptyAuthorities {
                zone: self.id.clone(),
                name: name.to_string(),
            }
        })
    }
}

/// Zones ordered most specific first; configuration order breaks ties.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    zones: Vec<ZoneConfig>,
}

impl ZoneRegistry {
    /// Validate and order `zones`.
    ///
    /// Fails when a zone id repeats or when no zone claims every path.
    pub fn new(mut zones: Vec<ZoneConfig>) -> Result<Self, ConfigurationError> {
        let mut seen = HashSet::new();
        for zone in &zones {
            if !seen.insert(zone.id.clone()) {
                return Err(ConfigurationError::DuplicateZone(zone.id.clone()));
            }
        }

        if !zones.iter().any(|z| z.pattern.is_catch_all()) {
            return Err(ConfigurationError::MissingDefaultZone);
        }

        // Stable sort: equal specificity keeps configuration order.
        zones.sort_by(|a, b| b.pattern.specificity().cmp(&a.pattern.specificity()));

        Ok(Self { zones })
    }

    /// The single zone responsible for `path`.
    pub fn resolve(&self, path: &str) -> Option<&ZoneConfig> {
        self.zones.iter().find(|z| z.pattern.matches(path))
    }

    pub fn get(&self, id: &ZoneId) -> Option<&ZoneConfig> {
        self.zones.iter().find(|z| &z.id == id)
    }

    /// Zones in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &ZoneConfig> {
        self.zones.iter()
    }
}
