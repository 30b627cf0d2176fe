#![allow(dead_code)]

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::get,
};
use orchestrator_exporter::{GaugeStore, HEALTH_GAUGE, sample_value};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;

/// An in-process orchestrator answering `/api/health/` with a swappable body.
#[derive(Clone)]
pub struct FakeOrchestrator {
    pub addr: SocketAddr,
    body: Arc<Mutex<(StatusCode, String)>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
}

impl FakeOrchestrator {
    pub async fn start(body: &str) -> Self {
        Self::start_on(0, body).await
    }

    /// Starts the orchestrator on a specific local port, `0` picks a free one.
    pub async fn start_on(port: u16, body: &str) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", port)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let fake = Self {
            addr,
            body: Arc::new(Mutex::new((StatusCode::OK, body.to_owned()))),
            auth: Arc::default(),
        };

        let router = Router::new()
            .route("/api/health/", get(health))
            .with_state(fake.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        fake
    }

    pub fn respond(&self, status: StatusCode, body: &str) {
        *self.body.lock().unwrap() = (status, body.to_owned());
    }

    /// `Authorization` headers seen so far, one entry per request.
    pub fn auth_headers(&self) -> Vec<Option<String>> {
        self.auth.lock().unwrap().clone()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

async fn health(
    State(fake): State<FakeOrchestrator>,
    headers: HeaderMap,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    fake.auth.lock().unwrap().push(auth);

    let (status, body) = fake.body.lock().unwrap().clone();
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// A port nothing listens on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

pub fn health_value(store: &GaugeStore) -> Option<f64> {
    sample_value(&store.render(), HEALTH_GAUGE, r#"status="orchesStatus""#)
}

pub const HEALTHY: &str = r#"{"Code":"OK","Message":"","Details":{"Healthy":true}}"#;
pub const UNHEALTHY: &str = r#"{"Code":"OK","Message":"","Details":{"Healthy":false}}"#;
pub const ELECTING: &str = r#"{"Code":"ERROR","Message":"leader election in progress"}"#;
