//! `configserver-core`: process configuration surface.
//!
//! Plain, immutable property records populated once at startup. This crate
//! knows nothing about HTTP or authentication decisions; it only loads and
//! shapes configuration.

pub mod error;
pub mod properties;
pub mod settings;

pub use error::{SettingsError, SettingsResult};
pub use properties::{
    ActuatorSecurityProperties, ApplicationProperties, DefaultSecurityProperties,
    InternalSecurityProperties, RegistryProperties, RegistryUser, UserProperties,
};
pub use settings::{PropertySourceProperties, ServerProperties, Settings};
