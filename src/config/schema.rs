//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the health monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Listener for the status API.
    pub listener: ListenerConfig,

    /// Process-wide fallbacks for per-service settings.
    pub defaults: DefaultsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Monitored services.
    #[serde(rename = "healthcheck")]
    pub services: Vec<ServiceConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Per-request timeout for the status API in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Defaults applied to services that leave a setting absent or zero.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Poll interval in milliseconds.
    pub interval_ms: u64,

    /// Probe timeout in milliseconds.
    pub timeout_ms: u64,

    /// Number of consecutive successes before marking healthy.
    pub healthy_threshold: u32,

    /// Number of consecutive failures before marking unhealthy.
    pub unhealthy_threshold: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            timeout_ms: 5_000,
            healthy_threshold: 2,
            unhealthy_threshold: 3,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:2112".to_string(),
        }
    }
}

/// A single monitored service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Unique service identifier, used as the metrics label.
    pub name: String,

    /// Probe kind: "http", "https" or "tcp".
    #[serde(alias = "interface")]
    pub kind: String,

    /// Target host name or IP.
    #[serde(default)]
    pub host: String,

    /// Target port (0 = scheme default for HTTP, required for TCP).
    #[serde(default)]
    pub port: u16,

    /// HTTP path to request.
    #[serde(default)]
    pub endpoint: String,

    /// Expected HTTP status code.
    #[serde(rename = "match", default = "default_match")]
    pub match_code: u16,

    #[serde(default)]
    pub interval_ms: Option<u64>,

    #[serde(default)]
    pub timeout_ms: Option<u64>,

    #[serde(default)]
    pub healthy_threshold: Option<u32>,

    #[serde(default)]
    pub unhealthy_threshold: Option<u32>,
}

fn default_match() -> u16 {
    200
}

impl ServiceConfig {
    /// Minimal TCP check with every optional setting left to the defaults.
    pub fn tcp(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            kind: "tcp".to_string(),
            host: host.into(),
            port,
            endpoint: String::new(),
            match_code: default_match(),
            interval_ms: None,
            timeout_ms: None,
            healthy_threshold: None,
            unhealthy_threshold: None,
        }
    }

    /// Minimal HTTP check with every optional setting left to the defaults.
    pub fn http(name: impl Into<String>, host: impl Into<String>, port: u16, endpoint: impl Into<String>) -> Self {
        Self {
            kind: "http".to_string(),
            endpoint: endpoint.into(),
            ..Self::tcp(name, host, port)
        }
    }
}
