use std::borrow::Cow;
use std::collections::BTreeSet;

use sha2::{Digest, Sha256};
use subtle::{Choice, ConstantTimeEq};

/// Coarse-grained permission label (e.g. `ROLE_INTERNAL`).
///
/// Checked by membership only; there is no hierarchy between authorities.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Authority(Cow<'static, str>);

impl Authority {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Authority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored secret.
///
/// Only the SHA-256 digest is kept, so equal-length comparison is guaranteed
/// and the plaintext never lingers in the credential store.
#[derive(Clone)]
pub struct Secret([u8; 32]);

impl Secret {
    pub fn new(plain: &str) -> Self {
        Self(digest(plain))
    }

    /// Constant-time comparison against a presented secret.
    pub fn verify(&self, presented: &str) -> Choice {
        self.verify_digest(&digest(presented))
    }

    pub(crate) fn verify_digest(&self, presented: &[u8; 32]) -> Choice {
        self.0[..].ct_eq(&presented[..])
    }
}

impl core::fmt::Debug for Secret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Secret(xxxx)")
    }
}

pub(crate) fn digest(plain: &str) -> [u8; 32] {
    Sha256::digest(plain.as_bytes()).into()
}

/// A configured identity: name, secret and a non-empty authority set.
#[derive(Debug, Clone)]
pub struct Principal {
    name: String,
    secret: Secret,
    authorities: BTreeSet<Authority>,
}

impl Principal {
    /// Build a principal. Returns `None` when `authorities` is empty.
    pub fn new<I>(name: impl Into<String>, secret: Secret, authorities: I) -> Option<Self>
    where
        I: IntoIterator<Item = Authority>,
    {
        let authorities: BTreeSet<Authority> = authorities.into_iter().collect();
        if authorities.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            secret,
            authorities,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    pub fn authorities(&self) -> &BTreeSet<Authority> {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &Authority) -> bool {
        self.authorities.contains(authority)
    }
}
