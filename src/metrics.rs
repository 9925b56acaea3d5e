// src/metrics.rs
//! Prometheus exposition and per-classification counters.

use axum::{routing::get, Router};
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::classify::ServingConfidence;

pub const CLASSIFICATIONS_TOTAL: &str = "serving_classifications_total";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Call once per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
        Ok(Self { handle })
    }

    /// Router exposing `/metrics` in the Prometheus text format.
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

/// Count one decision. No-op when no recorder is installed.
pub fn record_classification(confidence: &ServingConfidence) {
    counter!(
        CLASSIFICATIONS_TOTAL,
        "classification" => confidence.classification().as_str(),
        "safe" => if confidence.uses_safe_output() { "true" } else { "false" }
    )
    .increment(1);
}
