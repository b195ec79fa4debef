//! Canonical host enforcement for HTTP services.
//!
//! A middleware that permanently redirects requests to the canonical form of
//! their host (with or without a `www.`-style subdomain), plus a small gateway
//! that runs it in front of an upstream application.

pub mod config;
pub mod guard;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod redirect;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use redirect::{canonical_host_middleware, RedirectDecision, SubdomainRedirector};
