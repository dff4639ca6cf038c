//! Settings error model.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used by settings loading.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Failure while reading or parsing process configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The configuration file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is malformed or carries unknown keys.
    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// An environment override could not be applied.
    #[error("invalid value for {key}: {message}")]
    Override { key: &'static str, message: String },
}
