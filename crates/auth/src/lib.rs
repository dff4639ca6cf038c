//! `configserver-auth`: multi-zone authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP: the gateway sees a request
//! path and the raw `Authorization` header value, nothing else.

pub mod basic;
pub mod context;
pub mod error;
pub mod gateway;
pub mod loader;
pub mod path;
pub mod pattern;
pub mod principal;
pub mod store;
pub mod zone;

pub use basic::BasicCredentials;
pub use context::{AuthenticatedPrincipal, SecurityContext};
pub use error::ConfigurationError;
pub use gateway::{AccessRequest, AuthOutcome, Denial, DenialReason, SecurityGateway};
pub use path::canonical_path;
pub use pattern::PathPattern;
pub use principal::{Authority, Principal, Secret};
pub use store::CredentialStore;
pub use zone::{ZoneConfig, ZoneId, ZoneRegistry};
