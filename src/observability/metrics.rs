//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define monitor metrics (successes, failures, health gauge)
//! - Expose Prometheus-compatible metrics endpoint
//! - Label every series with the service name
//!
//! # Metrics
//! - `ducktor_total_successes` (counter): crossings into healthy
//! - `ducktor_total_failures` (counter): crossings into unhealthy
//! - `ducktor_is_healthy` (gauge): 1=healthy, 0=unhealthy
//!
//! # Design Decisions
//! - Emission happens on threshold crossings only, never per poll
//! - The state machine talks to `HealthRecorder`, not to the exporter

use std::net::SocketAddr;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const SUCCESSES: &str = "ducktor_total_successes";
pub const FAILURES: &str = "ducktor_total_failures";
pub const HEALTH: &str = "ducktor_is_healthy";

const SERVICE_LABEL: &str = "service_name";

/// Sink for health-transition metrics.
pub trait HealthRecorder: Send + Sync {
    fn record_success(&self, service: &str);
    fn record_failure(&self, service: &str);
    fn set_health(&self, service: &str, healthy: bool);
}

/// Recorder backed by the global `metrics` registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusRecorder;

impl HealthRecorder for PrometheusRecorder {
    fn record_success(&self, service: &str) {
        metrics::counter!(SUCCESSES, SERVICE_LABEL => service.to_string()).increment(1);
    }

    fn record_failure(&self, service: &str) {
        metrics::counter!(FAILURES, SERVICE_LABEL => service.to_string()).increment(1);
    }

    fn set_health(&self, service: &str, healthy: bool) {
        let value = if healthy { 1.0 } else { 0.0 };
        metrics::gauge!(HEALTH, SERVICE_LABEL => service.to_string()).set(value);
    }
}

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    metrics::describe_counter!(SUCCESSES, "The total number of health check successes.");
    metrics::describe_counter!(FAILURES, "The total number of health check failures.");
    metrics::describe_gauge!(HEALTH, "Whether the service is currently healthy.");

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}
