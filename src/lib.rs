#![warn(clippy::pedantic, clippy::nursery, clippy::cargo, clippy::perf)]

//! # `orchestrator_exporter`
//!
//! A Prometheus exporter for orchestrator clusters.
//!
//! A [`HealthPoller`] checks the orchestrator's `/api/health/` endpoint every two seconds and
//! publishes the answer as `orches_status{status="orchesStatus"}` (`1` healthy, `0` unhealthy)
//! into a [`GaugeStore`]. A [`MetricsServer`] renders that store, together with the exporter's
//! own process metrics, on `/metrics`.
//!
//! ```no_run
//! use orchestrator_exporter::{Config, GaugeStore, HealthPoller, MetricsServer, ProcessCollector};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), orchestrator_exporter::ExporterError> {
//! let config = Config::default();
//! let store = Arc::new(GaugeStore::new());
//! let process = Arc::new(ProcessCollector::new(&store));
//! let (_stop, shutdown) = tokio::sync::watch::channel(false);
//!
//! let server = MetricsServer::bind(&config.listen, store.clone(), process).await?;
//! tokio::spawn(server.serve(shutdown.clone()));
//! HealthPoller::new(&config, store).run(shutdown).await
//! # }
//! ```

mod config;
mod error;
mod gauge;
mod health;
mod poller;
mod process;
mod server;

pub use config::Config;
pub use error::ExporterError;
pub use gauge::{
    GaugeStore, HEALTH_GAUGE, HEALTH_GAUGE_HELP, ORCHES_STATUS, STATUS_LABEL, sample_value,
};
pub use health::{CODE_OK, HealthDetails, HealthStatus};
pub use poller::{HealthPoller, POLL_INTERVAL, REQUEST_TIMEOUT, TickOutcome};
pub use process::ProcessCollector;
pub use server::{EXPOSITION_CONTENT_TYPE, METRICS_PATH, MetricsServer};
