//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use ducktor::observability::metrics::HealthRecorder;

/// Start a TCP listener that accepts and immediately drops connections.
#[allow(dead_code)]
pub async fn start_tcp_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });

    addr
}

/// A loopback port with nothing listening on it.
#[allow(dead_code)]
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Start a programmable HTTP backend; `f` picks the status for each request.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = u16> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;

                let status = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    204 => "204 No Content",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status_text
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    addr
}

/// Event emitted to a `RecordingRecorder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    Success(String),
    Failure(String),
    Gauge(String, bool),
}

/// Recorder that keeps every emission for later assertions.
#[derive(Debug, Default)]
pub struct RecordingRecorder {
    events: Mutex<Vec<Emitted>>,
}

#[allow(dead_code)]
impl RecordingRecorder {
    pub fn events(&self) -> Vec<Emitted> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Emitted) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl HealthRecorder for RecordingRecorder {
    fn record_success(&self, service: &str) {
        self.events.lock().unwrap().push(Emitted::Success(service.to_string()));
    }

    fn record_failure(&self, service: &str) {
        self.events.lock().unwrap().push(Emitted::Failure(service.to_string()));
    }

    fn set_health(&self, service: &str, healthy: bool) {
        self.events.lock().unwrap().push(Emitted::Gauge(service.to_string(), healthy));
    }
}
