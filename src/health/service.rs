//! Resolved per-service settings.

use std::time::Duration;
use crate::config::{DefaultsConfig, ServiceConfig};
use crate::health::probe::ProbeKind;
use crate::health::types::HealthError;

/// Immutable, fully-resolved settings for one monitored service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub name: String,
    pub kind: ProbeKind,
    pub host: String,
    pub port: u16,
    pub endpoint: String,
    pub match_code: u16,
    pub interval: Duration,
    pub timeout: Duration,
    pub healthy_threshold: u32,
    pub unhealthy_threshold: u32,
}

impl ServiceSpec {
    /// Resolve a service entry, filling absent or zero settings from `defaults`.
    pub fn resolve(config: &ServiceConfig, defaults: &DefaultsConfig) -> Result<Self, HealthError> {
        let name = config.name.trim();
        if name.is_empty() {
            return Err(HealthError::MissingField {
                service: config.name.clone(),
                field: "name",
            });
        }

        let kind: ProbeKind = config.kind.parse()?;

        let interval_ms = non_zero(config.interval_ms).unwrap_or(defaults.interval_ms);
        let timeout_ms = non_zero(config.timeout_ms).unwrap_or(defaults.timeout_ms);

        Ok(Self {
            name: name.to_string(),
            kind,
            host: config.host.clone(),
            port: config.port,
            endpoint: config.endpoint.clone(),
            match_code: config.match_code,
            interval: Duration::from_millis(interval_ms.max(1)),
            timeout: Duration::from_millis(timeout_ms.max(1)),
            healthy_threshold: non_zero(config.healthy_threshold)
                .unwrap_or(defaults.healthy_threshold)
                .max(1),
            unhealthy_threshold: non_zero(config.unhealthy_threshold)
                .unwrap_or(defaults.unhealthy_threshold)
                .max(1),
        })
    }
}

fn non_zero<T: Default + PartialEq + Copy>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v != T::default())
}
