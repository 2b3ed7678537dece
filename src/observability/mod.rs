//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Health subsystem produces:
//!     → logging.rs (structured log events per poll and per transition)
//!     → metrics.rs (counters and gauge on threshold crossings)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
