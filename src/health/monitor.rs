//! Polling scheduler.
//!
//! # Responsibilities
//! - Build and validate one probe per configured service
//! - Run one independent polling loop per service
//! - Apply results to the shared state under the lock
//!
//! # Design Decisions
//! - Each service has exactly one writer: its own loop
//! - The lock is never held across an await
//! - Sleep follows the probe; a slow probe delays only its own service

use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

use crate::config::MonitorConfig;
use crate::health::probe::Probe;
use crate::health::service::ServiceSpec;
use crate::health::state::ServiceState;
use crate::health::status::{SharedStates, StatusView};
use crate::health::types::HealthError;
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::observability::metrics::HealthRecorder;

/// The health-evaluation engine.
///
/// Construction validates every service; `start` spawns the loops.
pub struct Monitor {
    probes: Vec<(ServiceSpec, Probe)>,
    states: SharedStates,
    recorder: Arc<dyn HealthRecorder>,
}

impl Monitor {
    /// Build a monitor from resolved services.
    ///
    /// Fails without starting anything if a probe cannot be built or a name
    /// repeats.
    pub fn new(specs: Vec<ServiceSpec>, recorder: Arc<dyn HealthRecorder>) -> Result<Self, HealthError> {
        let mut names = HashSet::new();
        let mut probes = Vec::with_capacity(specs.len());
        let mut states = Vec::with_capacity(specs.len());

        for spec in specs {
            if !names.insert(spec.name.clone()) {
                return Err(HealthError::DuplicateService(spec.name));
            }

            let probe = Probe::new(&spec)?;
            states.push(ServiceState::new(&spec, probe.target()));
            probes.push((spec, probe));
        }

        Ok(Self {
            probes,
            states: Arc::new(RwLock::new(states)),
            recorder,
        })
    }

    /// Resolve services against the configured defaults and build the monitor.
    pub fn from_config(config: &MonitorConfig, recorder: Arc<dyn HealthRecorder>) -> Result<Self, HealthError> {
        let specs = config
            .services
            .iter()
            .map(|s| ServiceSpec::resolve(s, &config.defaults))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(specs, recorder)
    }

    /// Read handle usable before and after `start`.
    pub fn status(&self) -> StatusView {
        StatusView::new(self.states.clone())
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Spawn one polling task per service and return immediately.
    pub fn start(self, shutdown: &Shutdown) -> MonitorHandle {
        let view = self.status();
        let mut tasks = Vec::with_capacity(self.probes.len());

        for (index, (spec, probe)) in self.probes.into_iter().enumerate() {
            tracing::info!(
                service = %spec.name,
                kind = %probe.kind(),
                target = %probe.target(),
                interval_ms = spec.interval.as_millis() as u64,
                healthy_threshold = spec.healthy_threshold,
                unhealthy_threshold = spec.unhealthy_threshold,
                "Starting health check loop"
            );

            let poller = Poller {
                index,
                name: spec.name,
                interval: spec.interval,
                probe,
                states: self.states.clone(),
                recorder: self.recorder.clone(),
            };
            tasks.push(tokio::spawn(poller.run(shutdown.subscribe())));
        }

        MonitorHandle { view, tasks }
    }
}

/// Running monitor.
pub struct MonitorHandle {
    view: StatusView,
    tasks: Vec<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn status(&self) -> StatusView {
        self.view.clone()
    }

    /// Wait for every loop to exit. Loops exit only on shutdown.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Health check loop panicked");
            }
        }
    }
}

/// One service's polling loop.
struct Poller {
    index: usize,
    name: String,
    interval: Duration,
    probe: Probe,
    states: SharedStates,
    recorder: Arc<dyn HealthRecorder>,
}

impl Poller {
    async fn run(self, mut shutdown: ShutdownSignal) {
        loop {
            let result = tokio::select! {
                result = self.probe.evaluate() => result,
                _ = shutdown.recv() => break,
            };

            tracing::debug!(
                service = %self.name,
                healthy = result.healthy,
                latency_ms = result.latency.as_micros() as f64 / 1000.0,
                error = ?result.error,
                "Health check completed"
            );

            {
                let mut states = self.states.write().expect("service state lock poisoned");
                states[self.index].record_result(result, self.recorder.as_ref());
            }

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!(service = %self.name, "Health check loop stopped");
    }
}
