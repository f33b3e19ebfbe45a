use std::sync::OnceLock;

use metrics::{counter, describe_histogram, gauge, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload. The recorder is process-global, so
/// repeated calls hand back the same handle.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            // Pre-register counters so they appear even before the first increment.
            for tier in ["normal", "moderate", "high"] {
                counter!("predictions_total", "risk_level" => tier).absolute(0);
            }
            counter!("prediction_failures_total").absolute(0);
            counter!("batch_requests_total").absolute(0);

            gauge!("models_loaded").set(0.0);

            describe_histogram!(
                "prediction_latency_seconds",
                Unit::Seconds,
                "Time spent scoring one transaction"
            );

            handle
        })
        .clone()
}
