//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Polling loops (monitor.rs):
//!     One task per service
//!     → probe.rs evaluate()
//!     → state.rs record_result() under the shared lock
//!     → observability::metrics on threshold crossings
//!
//! Readers (status.rs):
//!     StatusView::snapshot() under the same lock
//!     → http handlers, CLI
//! ```
//!
//! # Design Decisions
//! - State transitions require consecutive successes/failures
//! - Health state is per-service, one writer per service
//! - Probe failures are data, never errors that stop a loop
//! - Probes are bounded by a per-service timeout; a stalled peer only
//!   delays its own loop

pub mod monitor;
pub mod probe;
pub mod service;
pub mod state;
pub mod status;
pub mod types;

pub use monitor::{Monitor, MonitorHandle};
pub use probe::{Probe, ProbeKind};
pub use service::ServiceSpec;
pub use state::{HealthStatus, ServiceState, Transition};
pub use status::{MonitorSnapshot, ServiceSnapshot, StatusView};
pub use types::{HealthError, ProbeError, ProbeResult};
