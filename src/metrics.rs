//! Prometheus recorder, the `/metrics` route, and the descriptions of every
//! series the pipeline emits.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time registration of the pipeline series (so they show up on
/// `/metrics` with help text even before the first cycle emits them).
pub fn describe_pipeline_metrics() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_cycles_total", "Aggregation cycles completed.");
        describe_counter!(
            "pipeline_cycles_skipped_total",
            "Ticks skipped because a cycle was still running."
        );
        describe_counter!(
            "pipeline_fallback_total",
            "Cycles where every source failed and the cached snapshot was kept."
        );
        describe_counter!(
            "pipeline_items_parsed_total",
            "Items parsed from source payloads."
        );
        describe_counter!("pipeline_source_errors_total", "Per-source fetch/parse errors.");
        describe_histogram!("pipeline_parse_ms", "Payload parse time in milliseconds.");
        describe_gauge!("pipeline_snapshot_items", "Items in the published snapshot.");
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the pipeline last completed a cycle."
        );
        describe_gauge!(
            "pipeline_refresh_interval_secs",
            "Configured seconds between scheduled cycles."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and expose a static gauge with the
    /// configured refresh interval.
    pub fn init(refresh_interval_secs: u64) -> Self {
        // Use default buckets to avoid API differences across crate versions.
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_pipeline_metrics();
        gauge!("pipeline_refresh_interval_secs").set(refresh_interval_secs as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
