use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use configserver_auth::{AccessRequest, AuthOutcome, SecurityGateway};

use crate::problem::ProblemTranslator;

#[derive(Clone)]
pub struct GatewayState {
    pub gateway: Arc<SecurityGateway>,
    pub problems: Arc<dyn ProblemTranslator>,
}

/// Authenticate and authorize every request before it reaches a handler.
///
/// On success the request carries a [`configserver_auth::SecurityContext`]
/// extension that lives exactly as long as the request.
pub async fn security_gateway(
    State(state): State<GatewayState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let outcome = {
        // A header that is not visible ASCII is treated as malformed, not absent.
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or(""));
        state
            .gateway
            .authorize(&AccessRequest::new(req.uri().path(), authorization))
    };

    match outcome {
        AuthOutcome::Authorized(context) => {
            req.extensions_mut().insert(context);
            next.run(req).await
        }
        AuthOutcome::Unauthenticated(denial) => state.problems.unauthenticated(&denial),
        AuthOutcome::Forbidden(denial) => state.problems.forbidden(&denial),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Extension, Router};
    use configserver_auth::{BasicCredentials, SecurityContext};
    use configserver_core::{ApplicationProperties, UserProperties};
    use tower::ServiceExt;

    use crate::problem::ProblemSupport;

    fn router() -> Router {
        let mut props = ApplicationProperties::default();
        props.actuator_security.user = UserProperties::new("ops", "secret1");
        props.internal_security.user = vec![UserProperties::new("svcA", "a-secret")];
        let state = GatewayState {
            gateway: Arc::new(SecurityGateway::from_properties(&props).unwrap()),
            problems: Arc::new(ProblemSupport::new("test")),
        };

        Router::new()
            .route(
                "/actuator/health",
                get(|Extension(ctx): Extension<SecurityContext>| async move { ctx.principal().name.clone() }),
            )
            .layer(axum::middleware::from_fn_with_state(state, security_gateway))
    }

    fn request(path: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn authorized_request_reaches_handler_with_context() {
        let header = BasicCredentials::encode("ops", "secret1");
        let response = router()
            .oneshot(request("/actuator/health", Some(&header)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ops");
    }

    #[tokio::test]
    async fn missing_credentials_are_challenged() {
        let response = router().oneshot(request("/actuator/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[tokio::test]
    async fn dot_segments_never_reach_a_handler() {
        let header = BasicCredentials::encode("ops", "secret1");
        for path in ["/internal/../actuator/health", "/./actuator/health", "/x/%2e%2e/actuator/health"] {
            let response = router().oneshot(request(path, Some(&header))).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
        }
    }

    #[tokio::test]
    async fn non_ascii_header_is_rejected_not_ignored() {
        let mut req = request("/actuator/health", None);
        req.headers_mut().insert(
            header::AUTHORIZATION,
            axum::http::HeaderValue::from_bytes(b"Basic \xff\xfe").unwrap(),
        );
        let response = router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
