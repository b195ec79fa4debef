//! Request projection.
//!
//! Reduces an incoming request to the host, port, path and query values the
//! redirect decision is made from. Missing or non-UTF-8 values become empty
//! strings; nothing here fails.

use axum::http::{header, Request};

/// The parts of a request that decide a canonical-host redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// Host as sent by the client, port included.
    pub host_header: String,
    /// Host without the port.
    pub server_name: String,
    /// Port the client connected to, as a string.
    pub server_port: String,
    pub path: String,
    pub query: String,
}

impl RequestTarget {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let uri = req.uri();

        let host_header = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.as_str().to_string()))
            .unwrap_or_default();

        let (server_name, explicit_port) = split_host_port(&host_header);

        let server_port = explicit_port
            .map(str::to_string)
            .or_else(|| uri.port_u16().map(|p| p.to_string()))
            .unwrap_or_else(|| {
                if uri.scheme_str() == Some("https") {
                    "443".to_string()
                } else {
                    "80".to_string()
                }
            });

        Self {
            server_name: server_name.to_string(),
            server_port,
            path: uri.path().to_string(),
            query: uri.query().unwrap_or_default().to_string(),
            host_header,
        }
    }
}

/// Split `host[:port]`, keeping IPv6 brackets on the host.
fn split_host_port(host: &str) -> (&str, Option<&str>) {
    if let Some(end) = host.rfind(']') {
        let port = host[end + 1..].strip_prefix(':').filter(|p| !p.is_empty());
        return (&host[..=end], port);
    }

    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && !name.contains(':') => (name, Some(port)),
        Some((name, _)) if !name.contains(':') => (name, None),
        _ => (host, None),
    }
}
