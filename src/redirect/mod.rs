//! Canonical subdomain redirection.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → request.rs (project host, port, path, query)
//!     → policy.rs (guard, subdomain, IP, pattern and label checks)
//!     → Redirect: response.rs (301 + Location)
//!     → Pass: downstream handler, response returned verbatim
//! ```
//!
//! # Design Decisions
//! - Stateless: a pure function of (config, request)
//! - Redirect target is always https
//! - Prefix stripping is explicit, never regex substitution of the label

pub mod middleware;
pub mod policy;
pub mod request;
pub mod response;

pub use middleware::canonical_host_middleware;
pub use policy::{RedirectDecision, SubdomainRedirector};
pub use request::RequestTarget;
