//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the upstream fallback handler
//! - Wire up middleware (tracing, request ID, timeout, canonical host)
//! - Bind server to listener
//! - Run until the shutdown broadcast fires

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigError, GatewayConfig};
use crate::http::upstream::{forward_handler, Upstream};
use crate::redirect::{canonical_host_middleware, SubdomainRedirector};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// HTTP server for the canonical-host gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        let redirector = Arc::new(SubdomainRedirector::from_config(&config.redirect)?);
        let upstream = Upstream::new(&config.upstream);

        let router = Self::build_router(&config, redirector, upstream);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &GatewayConfig,
        redirector: Arc<SubdomainRedirector>,
        upstream: Upstream,
    ) -> Router {
        Router::new()
            .fallback(forward_handler)
            .with_state(upstream)
            .layer(middleware::from_fn_with_state(redirector, canonical_host_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                let request_id = req
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    request_id = %request_id,
                    method = %req.method(),
                    uri = %req.uri(),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            want_subdomain = self.config.redirect.want_subdomain,
            subdomain = %self.config.redirect.subdomain,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    fn request(host: &str) -> Request<Body> {
        Request::builder()
            .uri("/docs?page=2")
            .header("Host", host)
            .body(Body::empty())
            .unwrap()
    }

    fn server() -> HttpServer {
        let mut config = GatewayConfig::default();
        config.upstream.url = "http://127.0.0.1:1".into();
        HttpServer::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_router_redirects_with_request_id() {
        let response = server().router().oneshot(request("example.com")).await.unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://www.example.com/docs?page=2"
        );
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_router_forwards_canonical_host() {
        let response = server()
            .router()
            .oneshot(request("www.example.com"))
            .await
            .unwrap();

        // nothing listens on the upstream port
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[test]
    fn test_invalid_host_pattern_rejected() {
        let mut config = GatewayConfig::default();
        config.redirect.host_pattern = "(".into();
        assert!(matches!(HttpServer::new(config), Err(ConfigError::HostPattern(_))));
    }
}
