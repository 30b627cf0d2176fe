use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

/// Name of the exported health gauge.
pub const HEALTH_GAUGE: &str = "orches_status";
/// Help text of the exported health gauge.
pub const HEALTH_GAUGE_HELP: &str = "orchestrator cluster health";
/// The single label dimension of the health gauge.
pub const STATUS_LABEL: &str = "status";
/// The label value the poller publishes under.
pub const ORCHES_STATUS: &str = "orchesStatus";

/// Holds the published health gauge and renders it for scrapes.
///
/// The store owns its own Prometheus recorder instead of installing one globally, so every
/// instance is an isolated registry. Gauge handles are atomics: concurrent `set` and `render`
/// calls never observe a partially written value.
pub struct GaugeStore {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl Default for GaugeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GaugeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaugeStore").finish_non_exhaustive()
    }
}

impl GaugeStore {
    #[must_use]
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let store = Self { recorder, handle };
        store.record(|| {
            metrics::describe_gauge!(HEALTH_GAUGE, HEALTH_GAUGE_HELP);
        });
        store
    }

    /// Replaces the health gauge value for `label`.
    pub fn set(&self, label: &str, value: f64) {
        self.record(|| {
            metrics::gauge!(HEALTH_GAUGE, STATUS_LABEL => label.to_owned()).set(value);
        });
    }

    /// Renders every metric in the store in the Prometheus text exposition format.
    #[must_use]
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Runs `f` with this store as the active `metrics` recorder, so the regular macros write
    /// into it.
    pub fn record<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(&self.recorder, f)
    }
}

/// Reads the value of `name{labels}` out of rendered exposition text.
///
/// `labels` is the literal label block as rendered, e.g. `status="orchesStatus"`.
#[doc(hidden)]
#[must_use]
pub fn sample_value(exposition: &str, name: &str, labels: &str) -> Option<f64> {
    let series = if labels.is_empty() {
        format!("{name} ")
    } else {
        format!("{name}{{{labels}}} ")
    };
    exposition
        .lines()
        .find_map(|line| line.strip_prefix(series.as_str()))
        .and_then(|value| value.trim().parse().ok())
}
