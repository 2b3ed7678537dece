//! Protocol probes.
//!
//! # Responsibilities
//! - Contact one remote service per `evaluate` call
//! - Measure latency and classify the outcome
//! - Encode every failure in the returned `ProbeResult`
//!
//! # Design Decisions
//! - Closed set of probe kinds, selected once from configuration
//! - No retries inside a probe; the poll interval is the only retry policy
//! - Every probe is bounded by the service timeout

use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::str::FromStr;
use std::time::{Duration, Instant};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::time;
use url::Url;

use crate::health::service::ServiceSpec;
use crate::health::types::{HealthError, ProbeError, ProbeResult};

/// Supported probe protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    Http,
    Https,
    Tcp,
}

impl ProbeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::Http => "http",
            ProbeKind::Https => "https",
            ProbeKind::Tcp => "tcp",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeKind {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(ProbeKind::Http),
            "https" => Ok(ProbeKind::Https),
            "tcp" => Ok(ProbeKind::Tcp),
            _ => Err(HealthError::UnsupportedProbeKind(s.to_string())),
        }
    }
}

/// Bracket bare IPv6 literals so they can carry a port.
fn authority_host(host: &str) -> Cow<'_, str> {
    if host.contains(':') && !host.starts_with('[') {
        Cow::Owned(format!("[{}]", host))
    } else {
        Cow::Borrowed(host)
    }
}

/// Build a probe URL, leaving out the port when it is 0 and the path when empty.
pub fn build_url(scheme: &str, host: &str, port: u16, path: &str) -> String {
    let mut url = format!("{}://{}", scheme, authority_host(host));
    if port != 0 {
        let _ = write!(url, ":{}", port);
    }
    let path = path.trim_start_matches('/');
    if !path.is_empty() {
        url.push('/');
        url.push_str(path);
    }
    url
}

/// A probe bound to one service target.
#[derive(Debug, Clone)]
pub enum Probe {
    Http(HttpProbe),
    Tcp(TcpProbe),
}

impl Probe {
    /// Build the probe for a resolved service.
    pub fn new(spec: &ServiceSpec) -> Result<Self, HealthError> {
        if spec.host.trim().is_empty() {
            return Err(HealthError::MissingField {
                service: spec.name.clone(),
                field: "host",
            });
        }

        match spec.kind {
            ProbeKind::Http | ProbeKind::Https => HttpProbe::new(spec).map(Probe::Http),
            ProbeKind::Tcp => TcpProbe::new(spec).map(Probe::Tcp),
        }
    }

    pub fn kind(&self) -> ProbeKind {
        match self {
            Probe::Http(p) => p.kind,
            Probe::Tcp(_) => ProbeKind::Tcp,
        }
    }

    /// Human-readable target, the URL or `host:port`.
    pub fn target(&self) -> String {
        match self {
            Probe::Http(p) => p.url.to_string(),
            Probe::Tcp(p) => p.address.clone(),
        }
    }

    /// Run the probe once.
    pub async fn evaluate(&self) -> ProbeResult {
        match self {
            Probe::Http(p) => p.evaluate().await,
            Probe::Tcp(p) => p.evaluate().await,
        }
    }
}

/// HTTP/HTTPS GET probe.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    kind: ProbeKind,
    url: Url,
    expected_status: u16,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpProbe {
    fn new(spec: &ServiceSpec) -> Result<Self, HealthError> {
        let raw = build_url(spec.kind.as_str(), spec.host.trim(), spec.port, &spec.endpoint);
        let url = Url::parse(&raw).map_err(|source| HealthError::InvalidUrl {
            service: spec.name.clone(),
            url: raw.clone(),
            source,
        })?;

        // No idle pooling: every probe must open its own connection.
        let client = reqwest::Client::builder()
            .timeout(spec.timeout)
            .pool_max_idle_per_host(0)
            .no_proxy()
            .user_agent(concat!("ducktor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            kind: spec.kind,
            url,
            expected_status: spec.match_code,
            timeout: spec.timeout,
            client,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn evaluate(&self) -> ProbeResult {
        let start = Instant::now();
        let outcome = self.client.get(self.url.clone()).send().await;
        let latency = start.elapsed();

        match outcome {
            Ok(response) => {
                let actual = response.status().as_u16();
                if actual == self.expected_status {
                    ProbeResult::success(latency)
                } else {
                    ProbeResult::failure(
                        latency,
                        ProbeError::StatusMismatch {
                            expected: self.expected_status,
                            actual,
                        },
                    )
                }
            }
            Err(e) if e.is_timeout() => ProbeResult::failure(latency, ProbeError::Timeout(self.timeout)),
            Err(e) => ProbeResult::failure(latency, ProbeError::Unreachable(error_chain(&e))),
        }
    }
}

/// TCP connect probe.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    fn new(spec: &ServiceSpec) -> Result<Self, HealthError> {
        if spec.port == 0 {
            return Err(HealthError::MissingField {
                service: spec.name.clone(),
                field: "port",
            });
        }

        let address = format!("{}:{}", authority_host(spec.host.trim()), spec.port);

        Ok(Self {
            address,
            timeout: spec.timeout,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    async fn evaluate(&self) -> ProbeResult {
        let start = Instant::now();
        let outcome = time::timeout(self.timeout, TcpStream::connect(self.address.as_str())).await;
        let latency = start.elapsed();

        match outcome {
            Ok(Ok(stream)) => {
                drop(stream);
                ProbeResult::success(latency)
            }
            Ok(Err(e)) => ProbeResult::failure(latency, ProbeError::Unreachable(e.to_string())),
            Err(_) => ProbeResult::failure(latency, ProbeError::Timeout(self.timeout)),
        }
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(message, ": {}", cause);
        source = cause.source();
    }
    message
}
