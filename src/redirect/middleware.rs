//! Canonical host middleware.
//! Redirects requests whose host breaks the subdomain policy.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;
use crate::redirect::policy::{RedirectDecision, SubdomainRedirector};

/// Use with `axum::middleware::from_fn_with_state(Arc<SubdomainRedirector>, ..)`.
pub async fn canonical_host_middleware(
    State(redirector): State<Arc<SubdomainRedirector>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let RedirectDecision::Redirect { location } = redirector.decide(&req) {
        match redirector.redirect_response(&location) {
            Ok(response) => {
                tracing::debug!(
                    host = ?req.headers().get("host"),
                    location = %location,
                    policy = redirector.policy_label(),
                    "Redirecting to canonical host"
                );
                metrics::record_redirect(redirector.policy_label());
                return response;
            }
            Err(e) => {
                tracing::warn!(location = %location, error = %e, "Unusable redirect location, passing through");
            }
        }
    }

    tracing::trace!(path = %req.uri().path(), "Host already canonical");
    metrics::record_passthrough();
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedirectConfig;
    use axum::{
        http::{header, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app(config: RedirectConfig) -> Router {
        let redirector = Arc::new(SubdomainRedirector::from_config(&config).unwrap());
        Router::new()
            .route("/", get(|| async { ([("x-downstream", "1")], "downstream") }))
            .route("/path/{id}", get(|| async { "downstream" }))
            .layer(middleware::from_fn_with_state(redirector, canonical_host_middleware))
    }

    fn request(host: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("Host", host)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_redirects_bare_host() {
        let response = app(RedirectConfig::default())
            .oneshot(request("example.com", "/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "https://www.example.com/");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_passes_canonical_host_through() {
        let response = app(RedirectConfig::default())
            .oneshot(request("www.example.com", "/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        assert_eq!(response.headers()["x-downstream"], "1");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_string(response).await, "downstream");
    }

    #[tokio::test]
    async fn test_forbid_policy_keeps_path_and_query() {
        let config = RedirectConfig {
            want_subdomain: false,
            message: "Moved".into(),
            ..RedirectConfig::default()
        };
        let response = app(config)
            .oneshot(request("www.example.com", "/path/1?param=test"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://example.com/path/1?param=test"
        );
        assert_eq!(body_string(response).await, "Moved");
    }

    #[tokio::test]
    async fn test_ip_and_single_label_hosts_pass() {
        for host in ["127.0.0.1:8080", "localhost", "[::1]"] {
            let response = app(RedirectConfig::default())
                .oneshot(request(host, "/"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "host {host}");
        }
    }

    #[tokio::test]
    async fn test_non_default_port_kept() {
        let response = app(RedirectConfig::default())
            .oneshot(request("example.com:8080", "/path/7"))
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::LOCATION],
            "https://www.example.com:8080/path/7"
        );
    }

    #[tokio::test]
    async fn test_guard_from_config() {
        let mut config = RedirectConfig::default();
        config.guard.exclude_path_prefixes = vec!["/path".into()];

        let response = app(config.clone())
            .oneshot(request("example.com", "/path/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(config).oneshot(request("example.com", "/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    }
}
