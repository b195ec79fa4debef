//! Upstream forwarding.
//!
//! Every request the canonical-host middleware lets through is sent once to
//! the configured application. Only the URI scheme and authority are
//! rewritten; method, headers (Host included) and body stream through.

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::str::FromStr;
use std::time::Instant;

use crate::config::UpstreamConfig;
use crate::observability::metrics;

/// Shared client plus the upstream authority.
#[derive(Clone)]
pub struct Upstream {
    client: Client<HttpConnector, Body>,
    authority: Option<Authority>,
}

impl Upstream {
    pub fn new(config: &UpstreamConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let authority = Uri::from_str(&config.url)
            .ok()
            .and_then(|uri| uri.authority().cloned());
        if authority.is_none() {
            tracing::warn!(url = %config.url, "Upstream URL has no authority; requests will fail");
        }

        Self { client, authority }
    }

    /// Point `uri` at the upstream, keeping path and query.
    fn rewrite(&self, uri: &Uri) -> Option<Uri> {
        let mut parts = uri.clone().into_parts();
        parts.scheme = Some(Scheme::HTTP);
        parts.authority = Some(self.authority.clone()?);
        if parts.path_and_query.is_none() {
            parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        Uri::from_parts(parts).ok()
    }
}

/// Fallback handler: forward the request and relay the response.
pub async fn forward_handler(State(upstream): State<Upstream>, mut request: Request<Body>) -> Response {
    let start_time = Instant::now();

    let Some(uri) = upstream.rewrite(request.uri()) else {
        tracing::error!(uri = %request.uri(), "Cannot build upstream URI");
        metrics::record_upstream(502, start_time);
        return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
    };
    tracing::debug!(method = %request.method(), upstream = %uri, "Forwarding request");
    *request.uri_mut() = uri;

    match upstream.client.request(request).await {
        Ok(response) => {
            metrics::record_upstream(response.status().as_u16(), start_time);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(error = %e, "Upstream error");
            metrics::record_upstream(502, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
