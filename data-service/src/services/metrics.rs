//! Metrics collection and Prometheus export.

use crate::services::source::SourceMode;
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// This must be called once at startup before any metrics are recorded.
/// Panics if called more than once.
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub const RECORDS_SERVED_TOTAL: &str = "records_served_total";

/// Count records returned by one `fetch_all`, labelled by source.
pub fn record_records_served(source: SourceMode, count: usize) {
    counter!(RECORDS_SERVED_TOTAL, "source" => source.as_str()).increment(count as u64);
}
