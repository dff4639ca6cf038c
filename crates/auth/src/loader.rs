//! Builds the gateway from the `application.*` property tree.
//!
//! Zones produced:
//! - `default`: catch-all, any authenticated principal from any zone
//! - `actuator`: single administrative account, requires `ROLE_ACTUATOR`
//! - `internal`: one principal per trusted peer, requires `ROLE_INTERNAL`
//!
//! Both `actuator` and `internal` are always declared, so a missing account is a
//! startup error rather than a silently wider default zone.

use configserver_core::properties::{ACTUATOR_DEFAULT_AUTHORITY, INTERNAL_DEFAULT_AUTHORITY};
use configserver_core::{ApplicationProperties, UserProperties};

use crate::error::ConfigurationError;
use crate::gateway::SecurityGateway;
use crate::principal::{Authority, Principal};
use crate::store::CredentialStore;
use crate::zone::{ZoneConfig, ZoneId, ZoneRegistry};

impl SecurityGateway {
    pub fn from_properties(props: &ApplicationProperties) -> Result<Self, ConfigurationError> {
        let mut store = CredentialStore::new();

        let default = ZoneConfig::new(ZoneId::DEFAULT, &props.default_security.root_pattern)?;
        store.declare(ZoneId::DEFAULT);

        let actuator = ZoneConfig::new(ZoneId::ACTUATOR, &props.actuator_security.root_pattern)?
            .requiring(Authority::new(ACTUATOR_DEFAULT_AUTHORITY));
        let actuator_user = &props.actuator_security.user;
        if !actuator_user.is_unset() {
            let principal = principal_from(&actuator, actuator_user)?;
            store.insert(ZoneId::DEFAULT, principal.clone())?;
            store.insert(ZoneId::ACTUATOR, principal)?;
        }

        let internal = ZoneConfig::new(ZoneId::INTERNAL, &props.internal_security.root_pattern)?
            .requiring(Authority::new(INTERNAL_DEFAULT_AUTHORITY));
        store.declare(ZoneId::INTERNAL);
        for user in &props.internal_security.user {
            let principal = principal_from(&internal, user)?;
            store.insert(ZoneId::DEFAULT, principal.clone())?;
            store.insert(ZoneId::INTERNAL, principal)?;
        }

        SecurityGateway::new(ZoneRegistry::new(vec![default, actuator, internal])?, store)
    }

    /// Log the zone table (patterns, principal names, required authority).
    pub fn log_zones(&self) {
        for zone in self.zones().iter() {
            let principals: Vec<&str> = self.store().principals(zone.id()).iter().map(Principal::name).collect();
            tracing::info!(
                zone = %zone.id(),
                pattern = %zone.pattern(),
                required_authority = zone.required_authority().map(Authority::as_str).unwrap_or("-"),
                principals = ?principals,
                "security zone"
            );
        }
    }
}

fn principal_from(zone: &ZoneConfig, user: &UserProperties) -> Result<Principal, ConfigurationError> {
    let name = user
        .name
        .as_deref()
        .ok_or_else(|| ConfigurationError::MissingName { zone: zone.id().clone() })?;
    let secret = user
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ConfigurationError::MissingSecret {
            zone: zone.id().clone(),
            name: name.to_string(),
        })?;
    zone.principal(name, secret, user.authorities.as_deref())
}
