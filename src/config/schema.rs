//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::Deserialize;

/// Root configuration for the canonical-host gateway.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Canonical subdomain policy.
    pub redirect: RedirectConfig,

    /// Application that receives every request that is not redirected.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Subdomain redirect policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// `true` requires the subdomain prefix, `false` forbids it.
    #[serde(alias = "www")]
    pub want_subdomain: bool,

    /// Leading label to enforce (without the trailing dot).
    pub subdomain: String,

    /// Regex the lowercased Host header must match for a redirect to fire.
    pub host_pattern: String,

    /// Body written with every redirect response.
    pub message: RedirectBody,

    /// Conditions the request must satisfy before it is considered at all.
    pub guard: GuardConfig,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            want_subdomain: true,
            subdomain: "www".to_string(),
            host_pattern: ".+".to_string(),
            message: RedirectBody::default(),
            guard: GuardConfig::default(),
        }
    }
}

/// Redirect response body, either one string or a sequence of chunks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RedirectBody {
    Text(String),
    Lines(Vec<String>),
}

impl RedirectBody {
    /// Chunks in write order.
    pub fn chunks(&self) -> Vec<&str> {
        match self {
            RedirectBody::Text(text) => vec![text.as_str()],
            RedirectBody::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }

    /// The full body with all chunks concatenated.
    pub fn render(&self) -> String {
        self.chunks().concat()
    }
}

impl Default for RedirectBody {
    fn default() -> Self {
        RedirectBody::Text(String::new())
    }
}

impl From<&str> for RedirectBody {
    fn from(text: &str) -> Self {
        RedirectBody::Text(text.to_string())
    }
}

impl From<Vec<String>> for RedirectBody {
    fn from(lines: Vec<String>) -> Self {
        RedirectBody::Lines(lines)
    }
}

/// Declarative redirect guard. Every present condition must hold.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Host name to match (exact match, case-insensitive, port ignored).
    pub host: Option<String>,

    /// Path prefix the request must start with.
    pub path_prefix: Option<String>,

    /// Path prefixes that are never redirected.
    pub exclude_path_prefixes: Vec<String>,
}

/// Upstream application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the application (e.g., "http://127.0.0.1:3000").
    pub url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
