//! Redirect guard subsystem.
//!
//! # Data Flow
//! ```text
//! GuardConfig (host, path_prefix, exclude_path_prefixes)
//!     → from_config (compile into matchers)
//!     → AndMatcher, frozen inside the SubdomainRedirector
//!
//! Library users may inject any Matcher instead (see FnMatcher).
//! ```
//!
//! # Design Decisions
//! - Guards compiled at startup, immutable at runtime
//! - No regex in guards (exact host, prefix paths only)
//! - An unconfigured guard always matches

pub mod matcher;

pub use matcher::{AndMatcher, FnMatcher, HostMatcher, Matcher, NotMatcher, PathPrefixMatcher};

use crate::config::GuardConfig;

/// Compile a declarative guard into a single matcher.
pub fn from_config(config: &GuardConfig) -> AndMatcher {
    let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();

    if let Some(host) = &config.host {
        matchers.push(Box::new(HostMatcher::new(host.clone())));
    }
    if let Some(prefix) = &config.path_prefix {
        matchers.push(Box::new(PathPrefixMatcher::new(prefix.clone())));
    }
    for excluded in &config.exclude_path_prefixes {
        matchers.push(Box::new(NotMatcher::new(PathPrefixMatcher::new(excluded.clone()))));
    }

    AndMatcher::new(matchers)
}
