//! HTTP status server setup.
//!
//! # Responsibilities
//! - Create Axum Router with the status handlers
//! - Wire up middleware (tracing, request timeout)
//! - Serve until the shutdown signal fires

use std::time::Duration;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ListenerConfig;
use crate::health::StatusView;
use crate::http::handlers::{get_health, get_info, get_service_health, get_status};
use crate::lifecycle::ShutdownSignal;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub view: StatusView,
}

/// Query server over the monitor's status view.
pub struct StatusServer {
    router: Router,
}

impl StatusServer {
    pub fn new(view: StatusView, config: &ListenerConfig) -> Self {
        let state = AppState { view };
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(get_health))
            .route("/health/{service}", get(get_service_health))
            .route("/info", get(get_info))
            .route("/status", get(get_status))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Status server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        tracing::info!("Status server stopped");
        Ok(())
    }
}
