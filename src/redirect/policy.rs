//! Canonical subdomain policy.
//!
//! A request is redirected only when all of these hold:
//! - the guard matches (no guard = always)
//! - the Host header disagrees with the policy about the subdomain prefix
//! - the server name is not an IP literal
//! - the lowercased Host header matches the host pattern
//! - the bare host has exactly two labels (`example.com`, not `localhost`)

use std::net::IpAddr;

use axum::body::Body;
use axum::http::header::InvalidHeaderValue;
use axum::http::Request;
use axum::response::Response;
use regex::Regex;

use crate::config::{ConfigError, RedirectBody, RedirectConfig};
use crate::guard::{self, Matcher};
use crate::redirect::request::RequestTarget;
use crate::redirect::response::redirect_response;

/// Outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Answer with a 301 pointing at `location`.
    Redirect { location: String },
    /// Hand the request to the downstream handler untouched.
    Pass,
}

/// Enforces presence or absence of a subdomain label on the request host.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug)]
pub struct SubdomainRedirector {
    want_subdomain: bool,
    subdomain: String,
    host_pattern: Regex,
    guard: Option<Box<dyn Matcher>>,
    message: RedirectBody,
}

impl SubdomainRedirector {
    /// Compile a redirector from configuration.
    pub fn from_config(config: &RedirectConfig) -> Result<Self, ConfigError> {
        let host_pattern = Regex::new(&config.host_pattern)?;

        let compiled = guard::from_config(&config.guard);
        let guard: Option<Box<dyn Matcher>> = if compiled.is_empty() {
            None
        } else {
            Some(Box::new(compiled))
        };

        Ok(Self {
            want_subdomain: config.want_subdomain,
            subdomain: config.subdomain.clone(),
            host_pattern,
            guard,
            message: config.message.clone(),
        })
    }

    /// Replace the guard with a custom predicate.
    pub fn with_guard(mut self, guard: impl Matcher + 'static) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Replace the redirect body.
    pub fn with_message(mut self, message: impl Into<RedirectBody>) -> Self {
        self.message = message.into();
        self
    }

    /// Metrics/log label for the configured direction.
    pub fn policy_label(&self) -> &'static str {
        if self.want_subdomain {
            "require"
        } else {
            "forbid"
        }
    }

    /// Decide whether `req` must be redirected and where to.
    pub fn decide(&self, req: &Request<Body>) -> RedirectDecision {
        let target = RequestTarget::from_request(req);

        if self.guard_allows(req)
            && self.has_subdomain_mismatch(&target.host_header)
            && !self.is_ip_literal(&target.server_name)
            && self.matches_host(&target.host_header)
            && is_two_labels(self.bare_host(&target.server_name))
        {
            RedirectDecision::Redirect {
                location: self.location(&target),
            }
        } else {
            RedirectDecision::Pass
        }
    }

    /// Build the 301 response for `location` with the configured body.
    pub fn redirect_response(&self, location: &str) -> Result<Response, InvalidHeaderValue> {
        redirect_response(location, &self.message)
    }

    fn guard_allows(&self, req: &Request<Body>) -> bool {
        self.guard.as_ref().map_or(true, |g| g.matches(req))
    }

    fn has_subdomain_mismatch(&self, host_header: &str) -> bool {
        let already = strip_label(host_header, &self.subdomain).is_some();
        match (self.want_subdomain, already) {
            (true, true) => false,
            (true, false) => true,
            (false, true) => true,
            (false, false) => false,
        }
    }

    fn is_ip_literal(&self, server_name: &str) -> bool {
        let name = strip_label(server_name, &self.subdomain).unwrap_or(server_name);
        let name = strip_label(name, "www").unwrap_or(name);
        let name = name
            .strip_prefix('[')
            .and_then(|n| n.strip_suffix(']'))
            .unwrap_or(name);
        name.parse::<IpAddr>().is_ok()
    }

    fn matches_host(&self, host_header: &str) -> bool {
        self.host_pattern.is_match(&host_header.to_ascii_lowercase())
    }

    /// Server name with one leading `<subdomain>.` or `www.` removed.
    fn bare_host<'a>(&self, server_name: &'a str) -> &'a str {
        strip_label(server_name, &self.subdomain)
            .or_else(|| strip_label(server_name, "www"))
            .unwrap_or(server_name)
    }

    fn location(&self, target: &RequestTarget) -> String {
        let bare = self.bare_host(&target.server_name);
        let host = if self.want_subdomain && is_two_labels(bare) {
            format!("{}.{}", self.subdomain, bare)
        } else {
            bare.to_string()
        };

        let port = match target.server_port.as_str() {
            "80" | "443" => String::new(),
            other => format!(":{other}"),
        };

        let query = if target.query.is_empty() {
            String::new()
        } else {
            format!("?{}", target.query)
        };

        // Always https.
        format!("https://{host}{port}{}{query}", target.path)
    }
}

/// Remove a leading `label.` (ASCII case-insensitive).
fn strip_label<'a>(host: &'a str, label: &str) -> Option<&'a str> {
    let head = host.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    host[label.len()..].strip_prefix('.')
}

/// `name.tld` with both labels non-empty.
fn is_two_labels(host: &str) -> bool {
    match host.split_once('.') {
        Some((first, rest)) => !first.is_empty() && !rest.is_empty() && !rest.contains('.'),
        None => false,
    }
}
