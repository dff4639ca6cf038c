//! Zone-scoped credential store.
//!
//! Populated once at startup and read-only afterwards, so concurrent requests
//! share it without synchronization.

use std::collections::HashMap;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::error::ConfigurationError;
use crate::principal::{digest, Principal, Secret};
use crate::zone::ZoneId;

/// Mapping from zone to its ordered principals.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    zones: HashMap<ZoneId, Vec<Principal>>,
    // Stand-in secret for zones without principals.
    decoy: Secret,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            zones: HashMap::new(),
            decoy: Secret::new("\u{0}decoy"),
        }
    }

    /// Add a principal to `zone`. Names are unique per zone.
    pub fn insert(&mut self, zone: ZoneId, principal: Principal) -> Result<(), ConfigurationError> {
        let principals = self.zones.entry(zone.clone()).or_default();
        if principals.iter().any(|p| p.name() == principal.name()) {
            return Err(ConfigurationError::DuplicatePrincipal {
                zone,
                name: principal.name().to_string(),
            });
        }
        principals.push(principal);
        Ok(())
    }

    /// Declare `zone` without principals (so it shows up in `zones()`).
    pub fn declare(&mut self, zone: ZoneId) {
        self.zones.entry(zone).or_default();
    }

    pub fn lookup(&self, zone: &ZoneId, name: &str) -> Option<&Principal> {
        self.principals(zone).iter().find(|p| p.name() == name)
    }

    pub fn principals(&self, zone: &ZoneId) -> &[Principal] {
        self.zones.get(zone).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn zones(&self) -> impl Iterator<Item = &ZoneId> {
        self.zones.keys()
    }

    /// Resolve `name` in `zone` and check `secret`.
    ///
    /// Scans every principal of the zone and always performs exactly one
    /// digest comparison, so an unknown name and a wrong secret cost the same.
    pub fn verify(&self, zone: &ZoneId, name: &str, secret: &str) -> Option<&Principal> {
        let principals = self.principals(zone);
        let presented = digest(secret);

        let mut found = Choice::from(0);
        let mut index = 0u32;
        for (i, principal) in principals.iter().enumerate() {
            let is_match = principal.name().as_bytes().ct_eq(name.as_bytes()) & !found;
            index.conditional_assign(&(i as u32), is_match);
            found |= is_match;
        }

        let stored = principals
            .get(index as usize)
            .map(Principal::secret)
            .unwrap_or(&self.decoy);
        let secret_ok = stored.verify_digest(&presented);

        if bool::from(found & secret_ok) {
            principals.get(index as usize)
        } else {
            None
        }
    }
}
