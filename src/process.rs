use crate::gauge::GaugeStore;
use std::sync::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

const BUILD_INFO: &str = "orchestrator_exporter_build_info";

/// Publishes the exporter's own process metrics next to the health gauge.
///
/// Values are refreshed on demand, right before a scrape renders the store.
pub struct ProcessCollector {
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl std::fmt::Debug for ProcessCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessCollector")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl ProcessCollector {
    /// Describes the process metrics in `store` and records the build info series.
    #[must_use]
    pub fn new(store: &GaugeStore) -> Self {
        let pid = sysinfo::get_current_pid()
            .inspect_err(|e| log::warn!("Process metrics disabled: {e}"))
            .ok();

        store.record(|| {
            metrics::describe_gauge!(
                "process_resident_memory_bytes",
                metrics::Unit::Bytes,
                "Resident memory size in bytes."
            );
            metrics::describe_gauge!(
                "process_virtual_memory_bytes",
                metrics::Unit::Bytes,
                "Virtual memory size in bytes."
            );
            metrics::describe_gauge!(
                "process_start_time_seconds",
                metrics::Unit::Seconds,
                "Start time of the process since unix epoch in seconds."
            );
            metrics::describe_gauge!(
                "process_uptime_seconds",
                metrics::Unit::Seconds,
                "Time the process has been running in seconds."
            );
            metrics::describe_gauge!(
                "process_cpu_usage_percent",
                metrics::Unit::Percent,
                "CPU usage of the process since the previous scrape."
            );
            metrics::describe_gauge!(BUILD_INFO, "Build information of the exporter.");
            metrics::gauge!(BUILD_INFO, "version" => env!("CARGO_PKG_VERSION")).set(1.0);
        });

        Self {
            pid,
            system: Mutex::new(System::new()),
        }
    }

    /// Refreshes the process metrics in `store`.
    ///
    /// Failures are skipped quietly; a scrape must never fail because of them.
    #[allow(clippy::cast_precision_loss)]
    pub fn collect(&self, store: &GaugeStore) {
        let Some(pid) = self.pid else {
            return;
        };
        let Ok(mut system) = self.system.lock() else {
            log::debug!("Process metrics lock poisoned, skipping refresh");
            return;
        };

        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            ProcessRefreshKind::new().with_cpu().with_memory(),
        );
        let Some(process) = system.process(pid) else {
            log::debug!("Process {pid} not found, skipping refresh");
            return;
        };

        store.record(|| {
            metrics::gauge!("process_resident_memory_bytes").set(process.memory() as f64);
            metrics::gauge!("process_virtual_memory_bytes").set(process.virtual_memory() as f64);
            metrics::gauge!("process_start_time_seconds").set(process.start_time() as f64);
            metrics::gauge!("process_uptime_seconds").set(process.run_time() as f64);
            metrics::gauge!("process_cpu_usage_percent").set(f64::from(process.cpu_usage()));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::sample_value;

    #[test]
    fn build_info_is_recorded_once_constructed() {
        let store = GaugeStore::new();
        let _collector = ProcessCollector::new(&store);

        let labels = format!(r#"version="{}""#, env!("CARGO_PKG_VERSION"));
        assert_eq!(sample_value(&store.render(), BUILD_INFO, &labels), Some(1.0));
    }

    #[test]
    fn collect_publishes_memory_and_start_time() {
        let store = GaugeStore::new();
        let collector = ProcessCollector::new(&store);
        collector.collect(&store);

        let text = store.render();
        let rss = sample_value(&text, "process_resident_memory_bytes", "").unwrap();
        assert!(rss > 0.0);
        let started = sample_value(&text, "process_start_time_seconds", "").unwrap();
        assert!(started > 0.0);
    }
}
