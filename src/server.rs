use crate::{error::ExporterError, gauge::GaugeStore, process::ProcessCollector};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::watch};

/// Path the exposition is served on.
pub const METRICS_PATH: &str = "/metrics";
/// Content type of the Prometheus text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Clone)]
struct Scrape {
    store: Arc<GaugeStore>,
    process: Arc<ProcessCollector>,
}

/// The `/metrics` HTTP endpoint.
#[derive(Debug)]
pub struct MetricsServer {
    listener: TcpListener,
    router: Router,
}

impl MetricsServer {
    /// Binds `addr`, which may be a host name such as `localhost:1010`.
    ///
    /// # Errors
    /// Returns [`ExporterError::Bind`] if the address cannot be resolved or bound.
    pub async fn bind(
        addr: &str,
        store: Arc<GaugeStore>,
        process: Arc<ProcessCollector>,
    ) -> Result<Self, ExporterError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ExporterError::Bind {
                addr: addr.to_owned(),
                source,
            })?;
        Ok(Self {
            listener,
            router: router(store, process),
        })
    }

    /// The address the endpoint actually listens on.
    ///
    /// # Errors
    /// Returns an IO error if the socket has gone away.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves scrapes until `shutdown` flips to `true` or its sender goes away.
    ///
    /// # Errors
    /// Returns [`ExporterError::Serve`] if accepting connections fails fatally.
    pub async fn serve(self, mut shutdown: watch::Receiver<bool>) -> Result<(), ExporterError> {
        if let Ok(addr) = self.listener.local_addr() {
            log::info!("Serving metrics on http://{addr}{METRICS_PATH}");
        }
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await
            .map_err(ExporterError::Serve)
    }
}

fn router(store: Arc<GaugeStore>, process: Arc<ProcessCollector>) -> Router {
    Router::new()
        .route(METRICS_PATH, get(render_metrics))
        .with_state(Scrape { store, process })
}

async fn render_metrics(State(scrape): State<Scrape>) -> impl IntoResponse {
    scrape.process.collect(&scrape.store);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        scrape.store.render(),
    )
}
