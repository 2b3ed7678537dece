//! Status query API.
//!
//! # Data Flow
//! ```text
//! GET /health           → aggregate pass/fail over every service
//! GET /health/{service} → one service's verdict
//! GET /info             → latency, counts and thresholds per service
//! GET /status           → version and service count
//!     all backed by StatusView::snapshot()
//! ```

pub mod handlers;
pub mod server;

pub use server::StatusServer;
