//! Redirect guard conditions.
//!
//! # Responsibilities
//! - Match server name (exact match, case-insensitive, port ignored)
//! - Match path prefix (case-sensitive)
//! - Negate and combine conditions with AND semantics
//! - Wrap arbitrary predicates supplied by library users
//!
//! # Design Decisions
//! - Host matching is case-insensitive (RFC 9110)
//! - Path matching is case-sensitive
//! - Empty AND = always matches (wildcard)

use axum::body::Body;
use axum::http::Request;
use std::fmt;

use crate::redirect::RequestTarget;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches the host name of the request, without its port.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    expected_host: String,
}

impl HostMatcher {
    /// Create a new host matcher.
    /// The host is normalized to lowercase for case-insensitive matching.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            expected_host: host.into().to_lowercase(),
        }
    }
}

impl Matcher for HostMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        let target = RequestTarget::from_request(req);
        !target.server_name.is_empty() && target.server_name.eq_ignore_ascii_case(&self.expected_host)
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        req.uri().path().starts_with(&self.prefix)
    }
}

/// Inverts another matcher.
#[derive(Debug)]
pub struct NotMatcher {
    inner: Box<dyn Matcher>,
}

impl NotMatcher {
    pub fn new(inner: impl Matcher + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl Matcher for NotMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        !self.inner.matches(req)
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug, Default)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matchers.iter().all(|m| m.matches(req))
    }
}

/// Adapts a plain predicate into a [`Matcher`].
pub struct FnMatcher<F> {
    predicate: F,
}

impl<F> FnMatcher<F>
where
    F: Fn(&Request<Body>) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> fmt::Debug for FnMatcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnMatcher")
    }
}

impl<F> Matcher for FnMatcher<F>
where
    F: Fn(&Request<Body>) -> bool + Send + Sync,
{
    fn matches(&self, req: &Request<Body>) -> bool {
        (self.predicate)(req)
    }
}
