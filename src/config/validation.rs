//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject duplicate service names
//! - Validate value ranges (thresholds >= 1, ports set for TCP)
//! - Reject unsupported probe kinds before any loop starts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;
use crate::config::schema::MonitorConfig;
use crate::health::probe::ProbeKind;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no health checks configured")]
    NoServices,

    #[error("health check #{0} has an empty name")]
    EmptyName(usize),

    #[error("duplicate health check name `{0}`")]
    DuplicateName(String),

    #[error("health check `{name}`: unsupported probe kind `{kind}`")]
    UnsupportedKind { name: String, kind: String },

    #[error("health check `{0}`: host is required")]
    MissingHost(String),

    #[error("health check `{0}`: tcp checks require a non-zero port")]
    MissingPort(String),

    #[error("health check `{name}`: match code {code} is not a valid HTTP status")]
    InvalidMatchCode { name: String, code: u16 },

    #[error("defaults.{0} must be greater than zero")]
    ZeroDefault(&'static str),

    #[error("listener.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("{field}: `{value}` is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    let defaults = &config.defaults;
    if defaults.interval_ms == 0 {
        errors.push(ValidationError::ZeroDefault("interval_ms"));
    }
    if defaults.timeout_ms == 0 {
        errors.push(ValidationError::ZeroDefault("timeout_ms"));
    }
    if defaults.healthy_threshold == 0 {
        errors.push(ValidationError::ZeroDefault("healthy_threshold"));
    }
    if defaults.unhealthy_threshold == 0 {
        errors.push(ValidationError::ZeroDefault("unhealthy_threshold"));
    }

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    let mut seen = HashSet::new();
    for (i, service) in config.services.iter().enumerate() {
        if service.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName(i));
            continue;
        }
        if !seen.insert(service.name.as_str()) {
            errors.push(ValidationError::DuplicateName(service.name.clone()));
        }

        let kind = match service.kind.parse::<ProbeKind>() {
            Ok(kind) => kind,
            Err(_) => {
                errors.push(ValidationError::UnsupportedKind {
                    name: service.name.clone(),
                    kind: service.kind.clone(),
                });
                continue;
            }
        };

        if service.host.trim().is_empty() {
            errors.push(ValidationError::MissingHost(service.name.clone()));
        }

        match kind {
            ProbeKind::Tcp if service.port == 0 => {
                errors.push(ValidationError::MissingPort(service.name.clone()));
            }
            ProbeKind::Http | ProbeKind::Https if !(100..=599).contains(&service.match_code) => {
                errors.push(ValidationError::InvalidMatchCode {
                    name: service.name.clone(),
                    code: service.match_code,
                });
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ServiceConfig;

    fn config_with(services: Vec<ServiceConfig>) -> MonitorConfig {
        MonitorConfig {
            services,
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let config = config_with(vec![
            ServiceConfig::tcp("db", "localhost", 5432),
            ServiceConfig::http("api", "localhost", 0, ""),
        ]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_service_list_rejected() {
        let errors = validate_config(&config_with(vec![])).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoServices]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut bad_kind = ServiceConfig::tcp("c", "localhost", 1);
        bad_kind.kind = "icmp".into();
        let mut bad_match = ServiceConfig::http("d", "localhost", 80, "/");
        bad_match.match_code = 42;

        let mut config = config_with(vec![
            ServiceConfig::tcp("a", "localhost", 1),
            ServiceConfig::tcp("a", "localhost", 2),
            ServiceConfig::tcp("b", "", 0),
            bad_kind,
            bad_match,
        ]);
        config.defaults.healthy_threshold = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ZeroDefault("healthy_threshold")));
        assert!(errors.contains(&ValidationError::DuplicateName("a".into())));
        assert!(errors.contains(&ValidationError::MissingHost("b".into())));
        assert!(errors.contains(&ValidationError::MissingPort("b".into())));
        assert!(errors.contains(&ValidationError::UnsupportedKind {
            name: "c".into(),
            kind: "icmp".into(),
        }));
        assert!(errors.contains(&ValidationError::InvalidMatchCode {
            name: "d".into(),
            code: 42,
        }));
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_bad_bind_address() {
        let mut config = config_with(vec![ServiceConfig::tcp("a", "localhost", 1)]);
        config.listener.bind_address = "not-an-addr".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidAddress { field: "listener.bind_address", .. }));
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let mut config = config_with(vec![ServiceConfig::tcp("a", "localhost", 1)]);
        config.listener.request_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ZeroRequestTimeout]);
    }
}
