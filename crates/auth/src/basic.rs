//! `Authorization: Basic` credential extraction.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::gateway::DenialReason;

const SCHEME: &str = "basic";

/// Name/secret pair decoded from a Basic authorization header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    name: String,
    secret: String,
}

impl BasicCredentials {
    /// Decode `Basic base64(name:secret)`. The scheme is case-insensitive and
    /// the secret may itself contain `:`.
    pub fn parse(header: &str) -> Result<Self, DenialReason> {
        let header = header.trim();
        let (scheme, encoded) = header
            .split_once(' ')
            .ok_or(DenialReason::MalformedCredentials)?;
        if !scheme.eq_ignore_ascii_case(SCHEME) {
            return Err(DenialReason::UnsupportedScheme);
        }

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| DenialReason::MalformedCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| DenialReason::MalformedCredentials)?;

        let (name, secret) = decoded
            .split_once(':')
            .ok_or(DenialReason::MalformedCredentials)?;
        if name.is_empty() {
            return Err(DenialReason::MalformedCredentials);
        }

        Ok(Self {
            name: name.to_string(),
            secret: secret.to_string(),
        })
    }

    /// Encode as a header value (client side and tests).
    pub fn encode(name: &str, secret: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{name}:{secret}")))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl core::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("name", &self.name)
            .field("secret", &"xxxx")
            .finish()
    }
}
