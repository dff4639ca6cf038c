//! Security and registry property holders (the `application.*` tree).
//!
//! These records are deserialized from the settings document and then handed
//! to the auth crate, which validates them and builds the zone table. Nothing
//! here is mutated after startup.

use core::fmt;

use serde::Deserialize;

/// Authority granted to actuator users that omit an explicit list.
pub const ACTUATOR_DEFAULT_AUTHORITY: &str = "ROLE_ACTUATOR";

/// Authority granted to internal users that omit an explicit list.
pub const INTERNAL_DEFAULT_AUTHORITY: &str = "ROLE_INTERNAL";

/// Root of the `application` settings tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ApplicationProperties {
    pub registry: RegistryProperties,
    pub actuator_security: ActuatorSecurityProperties,
    pub internal_security: InternalSecurityProperties,
    pub default_security: DefaultSecurityProperties,
}

/// A principal record as it appears in configuration.
///
/// `authorities: None` means "not specified"; the owning zone fills in its
/// default authority. An explicit empty list is kept as-is and rejected when
/// the zone is built.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserProperties {
    pub name: Option<String>,
    pub password: Option<String>,
    pub authorities: Option<Vec<String>>,
}

impl UserProperties {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            password: Some(password.into()),
            authorities: None,
        }
    }

    pub fn with_authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorities = Some(authorities.into_iter().map(Into::into).collect());
        self
    }

    /// True when neither a name nor a password was supplied.
    pub fn is_unset(&self) -> bool {
        self.name.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for UserProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserProperties")
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "xxxx"))
            .field("authorities", &self.authorities)
            .finish()
    }
}

/// Operational endpoints zone (`application.actuator-security`).
///
/// Single administrative account. `info_pattern` and `health_pattern` are also
/// the mount paths of the corresponding endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ActuatorSecurityProperties {
    pub root_pattern: String,
    pub info_pattern: String,
    pub health_pattern: String,
    pub user: UserProperties,
}

impl Default for ActuatorSecurityProperties {
    fn default() -> Self {
        Self {
            root_pattern: "/actuator/**".to_string(),
            info_pattern: "/actuator/info".to_string(),
            health_pattern: "/actuator/health".to_string(),
            user: UserProperties::default(),
        }
    }
}

/// Service-to-service zone (`application.internal-security`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct InternalSecurityProperties {
    pub root_pattern: String,
    pub user: Vec<UserProperties>,
}

impl Default for InternalSecurityProperties {
    fn default() -> Self {
        Self {
            root_pattern: "/internal/**".to_string(),
            user: Vec::new(),
        }
    }
}

/// Catch-all zone covering every path no other zone claims.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DefaultSecurityProperties {
    pub root_pattern: String,
    /// Realm advertised in `WWW-Authenticate` challenges.
    pub realm: String,
}

impl Default for DefaultSecurityProperties {
    fn default() -> Self {
        Self {
            root_pattern: "/**".to_string(),
            realm: "config-server".to_string(),
        }
    }
}

/// Credentials this process presents to the service-discovery registry.
///
/// Outbound only: the gateway never enforces these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryProperties {
    pub host: String,
    pub port: u16,
    pub user: RegistryUser,
}

impl Default for RegistryProperties {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8761,
            user: RegistryUser::default(),
        }
    }
}

impl RegistryProperties {
    /// Registry endpoint without credentials, safe to log or expose.
    pub fn public_url(&self) -> String {
        format!("http://{}:{}/eureka/", self.host, self.port)
    }
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryUser {
    pub name: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for RegistryUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryUser")
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "xxxx"))
            .finish()
    }
}
