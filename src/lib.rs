//! Service liveness monitor library.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::MonitorConfig;
pub use health::{Monitor, MonitorHandle, StatusView};
pub use http::StatusServer;
pub use lifecycle::Shutdown;
