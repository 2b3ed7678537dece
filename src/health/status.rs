//! Read-only view over the shared service states.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::health::probe::ProbeKind;
use crate::health::state::{HealthStatus, ServiceState};

pub(crate) type SharedStates = Arc<RwLock<Vec<ServiceState>>>;

/// Point-in-time copy of one service's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSnapshot {
    pub name: String,
    pub kind: ProbeKind,
    pub target: String,
    pub status: HealthStatus,
    pub is_healthy: bool,
    pub healthy_count: u32,
    pub unhealthy_count: u32,
    pub healthy_threshold: u32,
    pub unhealthy_threshold: u32,
    pub interval: Duration,
    pub last_latency: Duration,
    pub last_error: Option<String>,
    pub checks: u64,
}

impl From<&ServiceState> for ServiceSnapshot {
    fn from(state: &ServiceState) -> Self {
        let last = state.last_result();
        Self {
            name: state.name().to_string(),
            kind: state.kind(),
            target: state.target().to_string(),
            status: state.status(),
            is_healthy: state.is_healthy(),
            healthy_count: state.healthy_count(),
            unhealthy_count: state.unhealthy_count(),
            healthy_threshold: state.healthy_threshold(),
            unhealthy_threshold: state.unhealthy_threshold(),
            interval: state.interval(),
            last_latency: last.latency,
            last_error: last.error.as_ref().map(ToString::to_string),
            checks: state.checks(),
        }
    }
}

/// Health of every service, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorSnapshot {
    pub services: BTreeMap<String, ServiceSnapshot>,
}

impl MonitorSnapshot {
    /// True when every service is healthy. Vacuously true with no services.
    pub fn is_healthy(&self) -> bool {
        self.services.values().all(|s| s.is_healthy)
    }

    /// Names of services that are not currently healthy, sorted.
    pub fn failing(&self) -> Vec<&str> {
        self.services
            .values()
            .filter(|s| !s.is_healthy)
            .map(|s| s.name.as_str())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&ServiceSnapshot> {
        self.services.get(name)
    }
}

/// Cloneable read handle onto the monitor's shared state.
#[derive(Debug, Clone)]
pub struct StatusView {
    states: SharedStates,
}

impl StatusView {
    pub(crate) fn new(states: SharedStates) -> Self {
        Self { states }
    }

    /// Consistent copy of all services, taken under one read lock.
    pub fn snapshot(&self) -> MonitorSnapshot {
        let states = self.states.read().expect("service state lock poisoned");
        let services = states
            .iter()
            .map(|s| (s.name().to_string(), ServiceSnapshot::from(s)))
            .collect();
        MonitorSnapshot { services }
    }

    /// Snapshot of a single service.
    pub fn service(&self, name: &str) -> Option<ServiceSnapshot> {
        let states = self.states.read().expect("service state lock poisoned");
        states.iter().find(|s| s.name() == name).map(ServiceSnapshot::from)
    }

    pub fn len(&self) -> usize {
        self.states.read().expect("service state lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
