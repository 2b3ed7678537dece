//! Service health state machine.
//!
//! # States
//! - Unknown: no verdict yet (reported as not healthy)
//! - Healthy: trailing successes reached `healthy_threshold`
//! - Unhealthy: trailing failures reached `unhealthy_threshold`
//!
//! # State Transitions
//! ```text
//! Unknown/Unhealthy → Healthy: consecutive successes >= healthy_threshold
//! Healthy → Unhealthy: consecutive failures >= unhealthy_threshold
//! Unknown → Unhealthy: same condition, but silent (health stays false)
//! ```
//!
//! # Design Decisions
//! - Hysteresis prevents flapping
//! - Counters are capped at their threshold
//! - Metrics fire on the crossing poll only

use std::time::Duration;
use serde::Serialize;

use crate::health::probe::ProbeKind;
use crate::health::service::ServiceSpec;
use crate::health::types::ProbeResult;
use crate::observability::metrics::HealthRecorder;

/// Published verdict for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Unknown,
    Healthy,
    Unhealthy,
}

/// A threshold crossing produced by `ServiceState::record_result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    BecameHealthy,
    BecameUnhealthy,
}

/// Mutable health state of one service.
#[derive(Debug, Clone)]
pub struct ServiceState {
    name: String,
    kind: ProbeKind,
    target: String,
    interval: Duration,
    healthy_threshold: u32,
    unhealthy_threshold: u32,

    status: HealthStatus,
    healthy_count: u32,
    unhealthy_count: u32,
    last_result: ProbeResult,
    checks: u64,
    transitions: u64,
}

impl ServiceState {
    pub fn new(spec: &ServiceSpec, target: impl Into<String>) -> Self {
        Self {
            name: spec.name.clone(),
            kind: spec.kind,
            target: target.into(),
            interval: spec.interval,
            healthy_threshold: spec.healthy_threshold.max(1),
            unhealthy_threshold: spec.unhealthy_threshold.max(1),
            status: HealthStatus::Unknown,
            healthy_count: 0,
            unhealthy_count: 0,
            last_result: ProbeResult::unknown(),
            checks: 0,
            transitions: 0,
        }
    }

    /// Feed one probe result through the state machine.
    ///
    /// Returns the transition when this result crosses a threshold; the
    /// recorder is called only in that case.
    pub fn record_result(&mut self, result: ProbeResult, recorder: &dyn HealthRecorder) -> Option<Transition> {
        self.checks += 1;

        let transition = if result.healthy {
            self.unhealthy_count = 0;
            self.healthy_count = (self.healthy_count + 1).min(self.healthy_threshold);

            if self.healthy_count >= self.healthy_threshold && self.status != HealthStatus::Healthy {
                self.status = HealthStatus::Healthy;
                Some(Transition::BecameHealthy)
            } else {
                None
            }
        } else {
            self.healthy_count = 0;
            self.unhealthy_count = (self.unhealthy_count + 1).min(self.unhealthy_threshold);

            if self.unhealthy_count < self.unhealthy_threshold {
                None
            } else {
                let was_healthy = self.status == HealthStatus::Healthy;
                self.status = HealthStatus::Unhealthy;
                was_healthy.then_some(Transition::BecameUnhealthy)
            }
        };

        self.last_result = result;

        match transition {
            Some(Transition::BecameHealthy) => {
                self.transitions += 1;
                recorder.record_success(&self.name);
                recorder.set_health(&self.name, true);
                tracing::info!(
                    service = %self.name,
                    successes = self.healthy_count,
                    "Service is healthy"
                );
            }
            Some(Transition::BecameUnhealthy) => {
                self.transitions += 1;
                recorder.record_failure(&self.name);
                recorder.set_health(&self.name, false);
                tracing::warn!(
                    service = %self.name,
                    failures = self.unhealthy_count,
                    error = ?self.last_result.error,
                    "Service is unhealthy"
                );
            }
            None => {}
        }

        transition
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ProbeKind {
        self.kind
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }

    pub fn healthy_count(&self) -> u32 {
        self.healthy_count
    }

    pub fn unhealthy_count(&self) -> u32 {
        self.unhealthy_count
    }

    pub fn healthy_threshold(&self) -> u32 {
        self.healthy_threshold
    }

    pub fn unhealthy_threshold(&self) -> u32 {
        self.unhealthy_threshold
    }

    pub fn last_result(&self) -> &ProbeResult {
        &self.last_result
    }

    /// Total results recorded.
    pub fn checks(&self) -> u64 {
        self.checks
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }
}
