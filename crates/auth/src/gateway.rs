//! The security gateway: one stateless `authorize` pass per request.
//!
//! 1. canonicalize the request path and resolve it to exactly one zone
//! 2. decode Basic credentials from the authorization header
//! 3. verify name/secret against that zone's credential store
//! 4. enforce the zone's required authority, if any
//!
//! Unauthenticated/Forbidden/Authorized are terminal; there is no challenge
//! continuation or session. CSRF protection is deliberately absent: callers
//! are machines presenting credentials on every request, never cookies.

use core::fmt;

use crate::basic::BasicCredentials;
use crate::context::SecurityContext;
use crate::error::ConfigurationError;
use crate::path::canonical_path;
use crate::principal::Authority;
use crate::store::CredentialStore;
use crate::zone::{ZoneId, ZoneRegistry};

/// The parts of an HTTP request the gateway inspects.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    pub path: &'a str,
    /// Raw `Authorization` header value, if present.
    pub authorization: Option<&'a str>,
}

impl<'a> AccessRequest<'a> {
    pub fn new(path: &'a str, authorization: Option<&'a str>) -> Self {
        Self { path, authorization }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// Encoded separators, dot segments, `;` parameters and the like.
    NonCanonicalPath,
    /// No zone claims the path.
    NoZone,
    MissingCredentials,
    UnsupportedScheme,
    MalformedCredentials,
    /// Unknown name or wrong secret; deliberately indistinguishable.
    BadCredentials,
    MissingAuthority(Authority),
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::NonCanonicalPath => "non_canonical_path",
            DenialReason::NoZone => "no_zone",
            DenialReason::MissingCredentials => "missing_credentials",
            DenialReason::UnsupportedScheme => "unsupported_scheme",
            DenialReason::MalformedCredentials => "malformed_credentials",
            DenialReason::BadCredentials => "bad_credentials",
            DenialReason::MissingAuthority(_) => "missing_authority",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NonCanonicalPath => f.write_str("request path is not in canonical form"),
            DenialReason::NoZone => f.write_str("no security zone covers this path"),
            DenialReason::MissingCredentials => f.write_str("credentials are required"),
            DenialReason::UnsupportedScheme => f.write_str("only Basic authentication is supported"),
            DenialReason::MalformedCredentials => f.write_str("malformed Basic credentials"),
            DenialReason::BadCredentials => f.write_str("bad credentials"),
            DenialReason::MissingAuthority(a) => write!(f, "authority '{a}' is required"),
        }
    }
}

/// Why and where a request was refused. Never carries the presented secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub zone: Option<ZoneId>,
    pub path: String,
    pub reason: DenialReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authorized(SecurityContext),
    Unauthenticated(Denial),
    Forbidden(Denial),
}

impl AuthOutcome {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthOutcome::Authorized(_))
    }
}

/// Zone table plus credential store, validated together at startup.
#[derive(Debug, Clone)]
pub struct SecurityGateway {
    zones: ZoneRegistry,
    store: CredentialStore,
}

impl SecurityGateway {
    /// Combine zones and credentials, failing fast on configurations that
    /// could never authorize a request for some zone.
    pub fn new(zones: ZoneRegistry, store: CredentialStore) -> Result<Self, ConfigurationError> {
        for id in store.zones() {
            if zones.get(id).is_none() {
                return Err(ConfigurationError::UnknownZone(id.clone()));
            }
        }

        for zone in zones.iter() {
            let Some(required) = zone.required_authority() else {
                continue;
            };
            let principals = store.principals(zone.id());
            if principals.is_empty() {
                return Err(ConfigurationError::NoPrincipals {
                    zone: zone.id().clone(),
                    authority: required.to_string(),
                });
            }
            if !principals.iter().any(|p| p.has_authority(required)) {
                return Err(ConfigurationError::UnsatisfiableZone {
                    zone: zone.id().clone(),
                    authority: required.to_string(),
                });
            }
        }

        Ok(Self { zones, store })
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Decide a single request. Pure: no state is read or written beyond the
    /// immutable zone table and credential store.
    pub fn authorize(&self, request: &AccessRequest<'_>) -> AuthOutcome {
        let Some(path) = canonical_path(request.path) else {
            return self.unauthenticated(None, request.path, DenialReason::NonCanonicalPath);
        };
        let Some(zone) = self.zones.resolve(&path) else {
            return self.unauthenticated(None, request.path, DenialReason::NoZone);
        };
        let zone_id = zone.id();

        let Some(header) = request.authorization else {
            return self.unauthenticated(Some(zone_id), request.path, DenialReason::MissingCredentials);
        };

        let credentials = match BasicCredentials::parse(header) {
            Ok(c) => c,
            Err(reason) => return self.unauthenticated(Some(zone_id), request.path, reason),
        };

        let Some(principal) = self.store.verify(zone_id, credentials.name(), credentials.secret()) else {
            return self.unauthenticated(Some(zone_id), request.path, DenialReason::BadCredentials);
        };

        if let Some(required) = zone.required_authority() {
            if !principal.has_authority(required) {
                tracing::warn!(
                    zone = %zone_id,
                    path = request.path,
                    principal = principal.name(),
                    authority = %required,
                    "access denied: missing authority"
                );
                return AuthOutcome::Forbidden(Denial {
                    zone: Some(zone_id.clone()),
                    path: request.path.to_string(),
                    reason: DenialReason::MissingAuthority(required.clone()),
                });
            }
        }

        tracing::debug!(zone = %zone_id, path = request.path, principal = principal.name(), "authorized");
        AuthOutcome::Authorized(SecurityContext::new(principal, zone_id.clone()))
    }

    fn unauthenticated(&self, zone: Option<&ZoneId>, path: &str, reason: DenialReason) -> AuthOutcome {
        tracing::warn!(
            zone = zone.map(ZoneId::as_str).unwrap_or("-"),
            path,
            reason = reason.as_str(),
            "authentication failed"
        );
        AuthOutcome::Unauthenticated(Denial {
            zone: zone.cloned(),
            path: path.to_string(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::ZoneConfig;
    use proptest::prelude::*;

    const ACTUATOR: &str = "ROLE_ACTUATOR";
    const INTERNAL: &str = "ROLE_INTERNAL";

    fn zones() -> (ZoneConfig, ZoneConfig, ZoneConfig) {
        let default = ZoneConfig::new(ZoneId::DEFAULT, "/**").unwrap();
        let actuator = ZoneConfig::new(ZoneId::ACTUATOR, "/actuator/**")
            .unwrap()
            .requiring(Authority::new(ACTUATOR));
        let internal = ZoneConfig::new(ZoneId::INTERNAL, "/internal/**")
            .unwrap()
            .requiring(Authority::new(INTERNAL));
        (default, actuator, internal)
    }

    fn gateway() -> SecurityGateway {
        let (default, actuator, internal) = zones();
        let mut store = CredentialStore::new();

        let ops = actuator.principal("ops", "secret1", None).unwrap();
        let svc_a = internal.principal("svcA", "a-secret", None).unwrap();
        let svc_b = internal
            .principal("svcB", "b-secret", Some(&["ROLE_READONLY".to_string()]))
            .unwrap();

        store.insert(ZoneId::DEFAULT, ops.clone()).unwrap();
        store.insert(ZoneId::DEFAULT, svc_a.clone()).unwrap();
        store.insert(ZoneId::ACTUATOR, ops).unwrap();
        store.insert(ZoneId::INTERNAL, svc_a).unwrap();
        store.insert(ZoneId::INTERNAL, svc_b).unwrap();

        let registry = ZoneRegistry::new(vec![default, actuator, internal]).unwrap();
        SecurityGateway::new(registry, store).unwrap()
    }

    fn basic(name: &str, secret: &str) -> String {
        BasicCredentials::encode(name, secret)
    }

    fn check(gw: &SecurityGateway, path: &str, header: Option<&str>) -> AuthOutcome {
        gw.authorize(&AccessRequest::new(path, header))
    }

    fn reason(outcome: &AuthOutcome) -> Option<&DenialReason> {
        match outcome {
            AuthOutcome::Authorized(_) => None,
            AuthOutcome::Unauthenticated(d) | AuthOutcome::Forbidden(d) => Some(&d.reason),
        }
    }

    #[test]
    fn actuator_scenario() {
        let gw = gateway();

        let ok = check(&gw, "/actuator/health", Some(&basic("ops", "secret1")));
        let AuthOutcome::Authorized(ctx) = ok else {
            panic!("expected Authorized, got {ok:?}");
        };
        assert_eq!(ctx.principal().name, "ops");
        assert_eq!(ctx.zone(), &ZoneId::ACTUATOR);
        assert!(ctx.principal().authorities.contains(&Authority::new(ACTUATOR)));

        let wrong = check(&gw, "/actuator/health", Some(&basic("ops", "wrong")));
        assert!(matches!(wrong, AuthOutcome::Unauthenticated(_)));

        let unknown = check(&gw, "/actuator/health", Some(&basic("other", "secret1")));
        assert!(matches!(unknown, AuthOutcome::Unauthenticated(_)));
    }

    #[test]
    fn internal_principal_without_required_authority_is_forbidden() {
        let gw = gateway();

        let outcome = check(&gw, "/internal/refresh", Some(&basic("svcB", "b-secret")));
        let AuthOutcome::Forbidden(denial) = outcome else {
            panic!("expected Forbidden, got {outcome:?}");
        };
        assert_eq!(denial.zone, Some(ZoneId::INTERNAL));
        assert_eq!(denial.reason, DenialReason::MissingAuthority(Authority::new(INTERNAL)));

        assert!(check(&gw, "/internal/refresh", Some(&basic("svcA", "a-secret"))).is_authorized());
    }

    #[test]
    fn principals_do_not_cross_zones() {
        let gw = gateway();
        // ops is not an internal principal, so this is an authentication failure.
        let outcome = check(&gw, "/internal/refresh", Some(&basic("ops", "secret1")));
        assert!(matches!(outcome, AuthOutcome::Unauthenticated(_)));
    }

    #[test]
    fn unclaimed_paths_fall_into_default_zone() {
        let gw = gateway();

        let outcome = check(&gw, "/config/app-default.yml", Some(&basic("svcA", "a-secret")));
        let AuthOutcome::Authorized(ctx) = outcome else {
            panic!("expected Authorized");
        };
        assert_eq!(ctx.zone(), &ZoneId::DEFAULT);

        assert!(check(&gw, "/billing/prod", Some(&basic("ops", "secret1"))).is_authorized());
        // svcB only exists in the internal zone.
        assert!(!check(&gw, "/billing/prod", Some(&basic("svcB", "b-secret"))).is_authorized());
    }

    #[test]
    fn wrong_secret_and_unknown_name_are_indistinguishable() {
        let gw = gateway();
        let wrong_secret = check(&gw, "/actuator/env", Some(&basic("ops", "nope")));
        let unknown_name = check(&gw, "/actuator/env", Some(&basic("ghost", "nope")));
        assert_eq!(wrong_secret, unknown_name);
    }

    #[test]
    fn relative_path_matches_no_zone() {
        let gw = gateway();
        let outcome = check(&gw, "actuator/health", Some(&basic("ops", "secret1")));
        assert_eq!(reason(&outcome), Some(&DenialReason::NoZone));
    }

    #[test]
    fn encoded_path_resolves_to_the_zone_of_its_decoded_form() {
        let gw = gateway();

        // ops is no internal principal, however the path is spelled.
        let outcome = check(&gw, "/%69nternal/refresh", Some(&basic("ops", "secret1")));
        let AuthOutcome::Unauthenticated(denial) = outcome else {
            panic!("expected Unauthenticated, got {outcome:?}");
        };
        assert_eq!(denial.zone, Some(ZoneId::INTERNAL));
        assert_eq!(denial.reason, DenialReason::BadCredentials);

        let outcome = check(&gw, "/internal/%72efresh", Some(&basic("svcB", "b-secret")));
        assert!(matches!(outcome, AuthOutcome::Forbidden(_)));

        assert!(check(&gw, "/%69nternal/refresh", Some(&basic("svcA", "a-secret"))).is_authorized());
    }

    #[test]
    fn non_canonical_paths_are_refused_before_zone_lookup() {
        let gw = gateway();
        let ops = basic("ops", "secret1");

        for path in [
            "/config%2F..%2Finternal/refresh",
            "/config%5Cinternal",
            "/config/../internal/refresh",
            "/./internal/refresh",
            "/config/%2e%2e/internal/refresh",
            "/internal;x=1/refresh",
            "//internal/refresh",
        ] {
            let outcome = check(&gw, path, Some(&ops));
            let AuthOutcome::Unauthenticated(denial) = outcome else {
                panic!("{path}: expected Unauthenticated, got {outcome:?}");
            };
            assert_eq!(denial.zone, None, "{path}");
            assert_eq!(denial.reason, DenialReason::NonCanonicalPath, "{path}");
            assert_eq!(denial.path, path);
        }
    }

    #[test]
    fn bearer_tokens_are_not_accepted() {
        let gw = gateway();
        let outcome = check(&gw, "/actuator/health", Some("Bearer abc"));
        assert_eq!(reason(&outcome), Some(&DenialReason::UnsupportedScheme));
    }

    #[test]
    fn zone_requiring_authority_without_principals_fails_construction() {
        let (default, actuator, _) = zones();
        let registry = ZoneRegistry::new(vec![default, actuator]).unwrap();
        let err = SecurityGateway::new(registry, CredentialStore::new()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::NoPrincipals {
                zone: ZoneId::ACTUATOR,
                authority: ACTUATOR.to_string(),
            }
        );
    }

    #[test]
    fn zone_nobody_can_satisfy_fails_construction() {
        let (default, _, internal) = zones();
        let mut store = CredentialStore::new();
        store
            .insert(
                ZoneId::INTERNAL,
                internal
                    .principal("svcB", "b", Some(&["ROLE_READONLY".to_string()]))
                    .unwrap(),
            )
            .unwrap();
        let registry = ZoneRegistry::new(vec![default, internal]).unwrap();
        let err = SecurityGateway::new(registry, store).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnsatisfiableZone { .. }));
    }

    #[test]
    fn credentials_for_undeclared_zone_fail_construction() {
        let (default, actuator, _) = zones();
        let mut store = CredentialStore::new();
        store
            .insert(ZoneId::ACTUATOR, actuator.principal("ops", "s", None).unwrap())
            .unwrap();
        store
            .insert(ZoneId::new("metrics"), actuator.principal("m", "s", None).unwrap())
            .unwrap();
        let registry = ZoneRegistry::new(vec![default, actuator]).unwrap();
        let err = SecurityGateway::new(registry, store).unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownZone(ZoneId::new("metrics")));
    }

    fn path_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("/actuator/health".to_string()),
            Just("/internal/refresh".to_string()),
            Just("/config/app-default.yml".to_string()),
            "(/[a-z0-9._-]{1,8}){0,4}",
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: without a credential header nothing is ever authorized.
        #[test]
        fn no_header_is_always_unauthenticated(path in path_strategy()) {
            let gw = gateway();
            let outcome = check(&gw, &path, None);
            prop_assert!(matches!(outcome, AuthOutcome::Unauthenticated(_)));
        }

        /// Property: repeated evaluation gives the same decision.
        #[test]
        fn authorize_is_idempotent(
            path in path_strategy(),
            name in prop_oneof![Just("ops"), Just("svcA"), Just("svcB"), Just("ghost")],
            secret in prop_oneof![Just("secret1"), Just("a-secret"), Just("b-secret"), Just("x")],
        ) {
            let gw = gateway();
            let header = basic(name, secret);
            let first = check(&gw, &path, Some(&header));
            let second = check(&gw, &path, Some(&header));

            match (&first, &second) {
                (AuthOutcome::Authorized(a), AuthOutcome::Authorized(b)) => {
                    prop_assert_eq!(a.principal(), b.principal());
                    prop_assert_eq!(a.zone(), b.zone());
                }
                _ => prop_assert_eq!(&first, &second),
            }
        }

        /// Property: a wrong secret for a known name and any unknown name yield
        /// the same denial.
        #[test]
        fn no_account_existence_oracle(
            path in path_strategy(),
            secret in "[a-z]{1,12}",
        ) {
            prop_assume!(secret != "secret1");
            let gw = gateway();
            let wrong = check(&gw, &path, Some(&basic("ops", &secret)));
            let unknown = check(&gw, &path, Some(&basic("nobody", &secret)));
            prop_assert_eq!(wrong, unknown);
        }
    }
}
