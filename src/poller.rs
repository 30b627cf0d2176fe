use crate::{
    config::Config,
    error::ExporterError,
    gauge::{GaugeStore, ORCHES_STATUS},
    health::HealthStatus,
};
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;

/// Delay between two health checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Upper bound for a single health check request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// What a single poll did to the health gauge.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The orchestrator answered `OK` and the gauge now holds this value.
    Published(f64),
    /// The orchestrator answered with a non-`OK` code; the gauge kept its previous value.
    Rejected { code: String, message: String },
    /// No response could be obtained; the gauge kept its previous value.
    Unreachable,
}

/// Periodically checks the orchestrator health API and publishes the result into a
/// [`GaugeStore`].
#[derive(Debug)]
pub struct HealthPoller {
    url: String,
    user: String,
    password: String,
    interval: Duration,
    timeout: Duration,
    store: Arc<GaugeStore>,
}

impl HealthPoller {
    #[must_use]
    pub fn new(config: &Config, store: Arc<GaugeStore>) -> Self {
        Self {
            url: config.health_url(),
            user: config.user.clone(),
            password: config.password.clone(),
            interval: POLL_INTERVAL,
            timeout: REQUEST_TIMEOUT,
            store,
        }
    }

    /// Sets the delay between two health checks.
    #[must_use]
    pub const fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the timeout of each health check request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Polls until `shutdown` flips to `true` or its sender goes away.
    ///
    /// The first check runs immediately. Transport failures and non-`OK` answers are logged and
    /// retried on the next tick; only an undecodable response ends the loop.
    ///
    /// # Errors
    /// Returns [`ExporterError::Decode`] when the orchestrator sends a body that is not a health
    /// document.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<(), ExporterError> {
        log::info!("Polling {} every {:?}", self.url, self.interval);
        loop {
            if *shutdown.borrow() {
                break;
            }

            if let Err(e) = self.tick().await {
                log::error!("Stopping health poller: {e}");
                return Err(e);
            }

            tokio::select! {
                () = tokio::time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        log::info!("Health poller stopped");
        Ok(())
    }

    /// Runs a single health check and applies it to the store.
    ///
    /// # Errors
    /// Returns [`ExporterError::Decode`] when the response body is not a health document. The
    /// store is left untouched in that case.
    pub async fn tick(&self) -> Result<TickOutcome, ExporterError> {
        let body = match self.fetch().await {
            Ok(body) => body,
            Err(e) => {
                log::error!("{e}");
                return Ok(TickOutcome::Unreachable);
            }
        };

        let status = HealthStatus::from_slice(&body)?;
        Ok(self.apply(status))
    }

    fn apply(&self, status: HealthStatus) -> TickOutcome {
        match status.gauge_value() {
            Some(value) => {
                log::debug!("Orchestrator reports healthy={}", status.details.healthy);
                self.store.set(ORCHES_STATUS, value);
                TickOutcome::Published(value)
            }
            None => {
                log::warn!("{}", status.message);
                TickOutcome::Rejected {
                    code: status.code,
                    message: status.message,
                }
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<u8>, ExporterError> {
        // a fresh client per tick, nothing is pooled between checks
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        log::debug!("GET {}", self.url);
        let response = client
            .get(&self.url)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
