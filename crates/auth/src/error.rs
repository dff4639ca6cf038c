use thiserror::Error;

use crate::zone::ZoneId;

/// Security configuration that cannot be served safely.
///
/// Always raised while building the gateway at startup; the process must not
/// start accepting traffic when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    #[error("zone '{0}' is declared more than once")]
    DuplicateZone(ZoneId),

    #[error("no default zone: paths outside every configured zone would be unguarded (add a '/**' zone)")]
    MissingDefaultZone,

    #[error("principals configured for undeclared zone '{0}'")]
    UnknownZone(ZoneId),

    #[error("zone '{zone}' requires authority '{authority}' but has no principals")]
    NoPrincipals { zone: ZoneId, authority: String },

    #[error("zone '{zone}' requires authority '{authority}' but no configured principal holds it")]
    UnsatisfiableZone { zone: ZoneId, authority: String },

    #[error("zone '{zone}' has a principal without a name")]
    MissingName { zone: ZoneId },

    #[error("principal '{name}' in zone '{zone}' has no secret")]
    MissingSecret { zone: ZoneId, name: String },

    #[error("principal '{name}' in zone '{zone}' has an empty authority list")]
    EmptyAuthorities { zone: ZoneId, name: String },

    #[error("principal '{name}' is configured more than once for zone '{zone}'")]
    DuplicatePrincipal { zone: ZoneId, name: String },
}
