//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML. Every
//! section has defaults, so an empty file is a valid (if useless) config.

use serde::{Deserialize, Serialize};

use crate::handler::static_site::DEFAULT_EXTENSIONS;

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Prefix redirects.
    pub redirects: Vec<RedirectConfig>,

    /// Static HTML sites to scan and watch.
    pub static_sites: Vec<StaticSiteConfig>,

    /// Jekyll sites to read at startup.
    pub jekyll_sites: Vec<JekyllSiteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Logging and metrics configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// A prefix redirect.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RedirectConfig {
    /// Path prefix, without leading or trailing slashes.
    pub prefix: String,

    /// Absolute URL or path that replaces the prefix.
    pub destination: String,
}

/// A static HTML site.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct StaticSiteConfig {
    /// Directory to scan and watch.
    pub root: String,

    /// File extensions treated as HTML documents.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl StaticSiteConfig {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

/// A Jekyll site.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct JekyllSiteConfig {
    /// Directory containing `_config.yml`.
    pub path: String,
}
