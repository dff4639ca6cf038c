//! Translation of gateway denials into HTTP responses.
//!
//! The gateway hands every `Unauthenticated`/`Forbidden` outcome to a
//! [`ProblemTranslator`]; nothing escapes as an unhandled fault.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;

use configserver_auth::Denial;

use crate::app::errors::problem;

pub trait ProblemTranslator: Send + Sync {
    /// 401: missing, malformed or unrecognized credentials.
    fn unauthenticated(&self, denial: &Denial) -> Response;

    /// 403: valid credentials lacking the zone's required authority.
    fn forbidden(&self, denial: &Denial) -> Response;
}

/// Default translator: shared problem body plus a Basic challenge on 401.
///
/// Never echoes the presented credentials; a [`Denial`] does not carry them.
#[derive(Debug, Clone)]
pub struct ProblemSupport {
    challenge: HeaderValue,
}

impl ProblemSupport {
    pub fn new(realm: &str) -> Self {
        let realm: String = realm.chars().filter(|c| *c != '"' && *c != '\\' && !c.is_control()).collect();
        let challenge = HeaderValue::from_str(&format!("Basic realm=\"{realm}\", charset=\"UTF-8\""))
            .unwrap_or_else(|_| HeaderValue::from_static("Basic realm=\"config-server\""));
        Self { challenge }
    }
}

impl ProblemTranslator for ProblemSupport {
    fn unauthenticated(&self, denial: &Denial) -> Response {
        let mut response = problem(StatusCode::UNAUTHORIZED, denial.reason.to_string(), Some(&denial.path));
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, self.challenge.clone());
        response
    }

    fn forbidden(&self, denial: &Denial) -> Response {
        problem(StatusCode::FORBIDDEN, denial.reason.to_string(), Some(&denial.path))
    }
}
