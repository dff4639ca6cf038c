//! Settings document loading (YAML file + environment overrides).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SettingsError, SettingsResult};
use crate::properties::ApplicationProperties;

/// Environment variable naming the settings file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_SERVER_CONFIG";

/// Environment variable overriding `server.bind`.
pub const BIND_ADDR_ENV: &str = "BIND_ADDR";

const DEFAULT_CONFIG_PATH: &str = "config/application.yml";

/// Complete process configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    pub application: ApplicationProperties,
    pub server: ServerProperties,
    /// Property sources served by the in-memory configuration provider.
    pub property_sources: Vec<PropertySourceProperties>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerProperties {
    pub name: String,
    pub bind: String,
}

impl Default for ServerProperties {
    fn default() -> Self {
        Self {
            name: "config-server".to_string(),
            bind: "0.0.0.0:8888".to_string(),
        }
    }
}

/// One named property sheet for an `(application, profile, label)` triple.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertySourceProperties {
    pub application: String,
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

fn default_profile() -> String {
    "default".to_string()
}

impl Settings {
    pub fn from_yaml_str(document: &str) -> SettingsResult<Self> {
        if document.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(document)?)
    }

    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        let document = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&document)
    }

    /// Load settings from the process environment.
    pub fn load() -> SettingsResult<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load settings using `lookup` to resolve environment variables.
    ///
    /// An explicitly named file must exist; the default path may be absent,
    /// in which case built-in defaults apply.
    pub fn load_with<F>(lookup: F) -> SettingsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(CONFIG_PATH_ENV) {
            Some(path) => Self::from_path(&PathBuf::from(path))?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_path(path)?
                } else {
                    tracing::info!(path = DEFAULT_CONFIG_PATH, "settings file not found; using defaults");
                    Self::default()
                }
            }
        };

        if let Some(bind) = lookup(BIND_ADDR_ENV) {
            let bind = bind.trim();
            if bind.is_empty() {
                return Err(SettingsError::Override {
                    key: BIND_ADDR_ENV,
                    message: "must not be empty".to_string(),
                });
            }
            settings.server.bind = bind.to_string();
        }

        Ok(settings)
    }
}
