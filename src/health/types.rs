//! Shared health-check types.

use std::time::Duration;
use thiserror::Error;

/// Why a probe reported the target as unhealthy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Transport-level failure: refused, reset, DNS, TLS.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// The peer answered, but not with the configured status.
    #[error("unexpected status {actual}, expected {expected}")]
    StatusMismatch { expected: u16, actual: u16 },

    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    /// No probe has completed yet.
    #[error("no probe result yet")]
    Unknown,
}

impl ProbeError {
    /// True for failures where the peer could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ProbeError::Unreachable(_) | ProbeError::Timeout(_))
    }
}

/// Outcome of a single probe invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub healthy: bool,
    pub latency: Duration,
    pub error: Option<ProbeError>,
}

impl ProbeResult {
    pub fn success(latency: Duration) -> Self {
        Self {
            healthy: true,
            latency,
            error: None,
        }
    }

    pub fn failure(latency: Duration, error: ProbeError) -> Self {
        Self {
            healthy: false,
            latency,
            error: Some(error),
        }
    }

    /// Placeholder held by a service before its first probe completes.
    pub fn unknown() -> Self {
        Self::failure(Duration::ZERO, ProbeError::Unknown)
    }
}

/// Errors raised while building the monitor. All are fatal at startup.
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("unsupported probe kind `{0}`")]
    UnsupportedProbeKind(String),

    #[error("service `{service}`: missing required field `{field}`")]
    MissingField { service: String, field: &'static str },

    #[error("service `{service}`: invalid probe URL `{url}`: {source}")]
    InvalidUrl {
        service: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("duplicate service name `{0}`")]
    DuplicateService(String),
}
