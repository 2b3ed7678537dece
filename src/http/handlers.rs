use std::collections::BTreeMap;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::health::{HealthStatus, ProbeKind, ServiceSnapshot};
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub services: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failing: Vec<String>,
    pub services: BTreeMap<String, bool>,
}

#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub name: String,
    pub status: HealthStatus,
    pub healthy: bool,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub kind: ProbeKind,
    pub target: String,
    pub status: HealthStatus,
    pub healthy: bool,
    pub latency_ms: f64,
    pub error: Option<String>,
    pub healthy_count: u32,
    pub unhealthy_count: u32,
    pub healthy_threshold: u32,
    pub unhealthy_threshold: u32,
    pub interval_ms: u64,
    pub checks: u64,
}

impl From<ServiceSnapshot> for ServiceInfo {
    fn from(s: ServiceSnapshot) -> Self {
        Self {
            latency_ms: s.last_latency.as_micros() as f64 / 1000.0,
            interval_ms: s.interval.as_millis() as u64,
            name: s.name,
            kind: s.kind,
            target: s.target,
            status: s.status,
            healthy: s.is_healthy,
            error: s.last_error,
            healthy_count: s.healthy_count,
            unhealthy_count: s.unhealthy_count,
            healthy_threshold: s.healthy_threshold,
            unhealthy_threshold: s.unhealthy_threshold,
            checks: s.checks,
        }
    }
}

fn verdict_code(healthy: bool) -> StatusCode {
    if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        services: state.view.len(),
    })
}

/// Aggregate check: 200 when every service is healthy, 503 otherwise.
pub async fn get_health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let snapshot = state.view.snapshot();
    let healthy = snapshot.is_healthy();

    let report = HealthReport {
        status: if healthy { "pass" } else { "fail" },
        failing: snapshot.failing().into_iter().map(String::from).collect(),
        services: snapshot
            .services
            .iter()
            .map(|(name, s)| (name.clone(), s.is_healthy))
            .collect(),
    };

    (verdict_code(healthy), Json(report))
}

pub async fn get_service_health(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<ServiceHealth>), StatusCode> {
    let service = state.view.service(&name).ok_or(StatusCode::NOT_FOUND)?;

    Ok((
        verdict_code(service.is_healthy),
        Json(ServiceHealth {
            name: service.name,
            status: service.status,
            healthy: service.is_healthy,
        }),
    ))
}

pub async fn get_info(State(state): State<AppState>) -> Json<Vec<ServiceInfo>> {
    let snapshot = state.view.snapshot();
    Json(snapshot.services.into_values().map(ServiceInfo::from).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, RwLock};
    use std::time::Duration;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{DefaultsConfig, ListenerConfig, ServiceConfig};
    use crate::health::{ProbeError, ProbeResult, ServiceSpec, ServiceState, StatusView};
    use crate::http::server::StatusServer;
    use crate::observability::metrics::HealthRecorder;

    struct Discard;

    impl HealthRecorder for Discard {
        fn record_success(&self, _: &str) {}
        fn record_failure(&self, _: &str) {}
        fn set_health(&self, _: &str, _: bool) {}
    }

    fn shared(names: &[&str]) -> Arc<RwLock<Vec<ServiceState>>> {
        let states = names
            .iter()
            .map(|n| {
                let mut config = ServiceConfig::http(*n, "localhost", 8001, "health");
                config.healthy_threshold = Some(1);
                config.unhealthy_threshold = Some(1);
                let spec = ServiceSpec::resolve(&config, &DefaultsConfig::default()).unwrap();
                ServiceState::new(&spec, "http://localhost:8001/health")
            })
            .collect();
        Arc::new(RwLock::new(states))
    }

    fn mark(states: &Arc<RwLock<Vec<ServiceState>>>, index: usize, healthy: bool) {
        let result = if healthy {
            ProbeResult::success(Duration::from_millis(12))
        } else {
            ProbeResult::failure(Duration::from_millis(3), ProbeError::Unreachable("connection refused".into()))
        };
        states.write().unwrap()[index].record_result(result, &Discard);
    }

    async fn call(states: &Arc<RwLock<Vec<ServiceState>>>, uri: &str) -> (StatusCode, Value) {
        let server = StatusServer::new(StatusView::new(states.clone()), &ListenerConfig::default());
        let response = server
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health_passes_when_all_healthy() {
        let states = shared(&["api", "web"]);
        mark(&states, 0, true);
        mark(&states, 1, true);

        let (status, body) = call(&states, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pass");
        assert!(body.get("failing").is_none());
        assert_eq!(body["services"]["api"], true);
    }

    #[tokio::test]
    async fn test_health_fails_with_failing_names() {
        let states = shared(&["api", "db", "web"]);
        mark(&states, 0, true);
        mark(&states, 1, false);

        let (status, body) = call(&states, "/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["failing"], serde_json::json!(["db", "web"]));
        assert_eq!(body["services"]["api"], true);
        assert_eq!(body["services"]["db"], false);
    }

    #[tokio::test]
    async fn test_service_health_lookup() {
        let states = shared(&["api", "db"]);
        mark(&states, 0, true);
        mark(&states, 1, false);

        let (status, body) = call(&states, "/health/api").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = call(&states, "/health/db").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["healthy"], false);

        let (status, _) = call(&states, "/health/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_info_reports_details() {
        let states = shared(&["api"]);
        mark(&states, 0, false);

        let (status, body) = call(&states, "/info").await;
        assert_eq!(status, StatusCode::OK);
        let api = &body[0];
        assert_eq!(api["name"], "api");
        assert_eq!(api["kind"], "http");
        assert_eq!(api["status"], "unhealthy");
        assert_eq!(api["latency_ms"], 3.0);
        assert_eq!(api["error"], "unreachable: connection refused");
        assert_eq!(api["unhealthy_count"], 1);
        assert_eq!(api["unhealthy_threshold"], 1);
        assert_eq!(api["interval_ms"], 10_000);
        assert_eq!(api["checks"], 1);
    }

    #[tokio::test]
    async fn test_status_reports_version() {
        let states = shared(&["a", "b"]);
        let (status, body) = call(&states, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["services"], 2);
    }
}
