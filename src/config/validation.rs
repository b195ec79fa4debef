//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and anything that
//! must compile or parse before the gateway starts. All errors are returned,
//! not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("redirect.subdomain must be a single non-empty label, got {0:?}")]
    InvalidSubdomain(String),

    #[error("redirect.host_pattern does not compile: {0}")]
    InvalidHostPattern(String),

    #[error("redirect.guard path {0:?} must start with '/'")]
    InvalidGuardPath(String),

    #[error("upstream.url {0:?} is not an absolute http URL")]
    InvalidUpstream(String),

    #[error("{field} {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let subdomain = &config.redirect.subdomain;
    if subdomain.is_empty()
        || subdomain.contains('.')
        || subdomain.chars().any(char::is_whitespace)
    {
        errors.push(ValidationError::InvalidSubdomain(subdomain.clone()));
    }

    if let Err(e) = regex::Regex::new(&config.redirect.host_pattern) {
        errors.push(ValidationError::InvalidHostPattern(e.to_string()));
    }

    let guard = &config.redirect.guard;
    for path in guard.path_prefix.iter().chain(guard.exclude_path_prefixes.iter()) {
        if !path.starts_with('/') {
            errors.push(ValidationError::InvalidGuardPath(path.clone()));
        }
    }

    match Url::parse(&config.upstream.url) {
        Ok(url) if url.scheme() == "http" && url.host_str().is_some() => {}
        _ => errors.push(ValidationError::InvalidUpstream(config.upstream.url.clone())),
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
