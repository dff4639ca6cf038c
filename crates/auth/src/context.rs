//! Per-request security context.
//!
//! Created by the gateway for exactly one request and dropped with it. It is
//! never cached, shared between requests, or written to a session store.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::principal::{Authority, Principal};
use crate::zone::ZoneId;

/// The authenticated identity as seen by downstream handlers (no secret).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub name: String,
    pub authorities: Vec<Authority>,
}

impl From<&Principal> for AuthenticatedPrincipal {
    fn from(principal: &Principal) -> Self {
        Self {
            name: principal.name().to_string(),
            authorities: principal.authorities().iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    request_id: Uuid,
    principal: AuthenticatedPrincipal,
    zone: ZoneId,
    authenticated_at: DateTime<Utc>,
}

impl SecurityContext {
    pub fn new(principal: &Principal, zone: ZoneId) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            principal: principal.into(),
            zone,
            authenticated_at: Utc::now(),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn principal(&self) -> &AuthenticatedPrincipal {
        &self.principal
    }

    pub fn zone(&self) -> &ZoneId {
        &self.zone
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}
