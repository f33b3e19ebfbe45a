pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod ml;
pub mod models;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::ml::{ArtifactStore, FraudScorer};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub artifacts: Arc<ArtifactStore>,
    pub scorer: FraudScorer,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl AppState {
    /// Wire the scorer to the artifact store so both see the same reloads.
    pub fn new(
        db: sqlx::PgPool,
        config: AppConfig,
        artifacts: Arc<ArtifactStore>,
        metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        let scorer = FraudScorer::new(artifacts.clone(), config.risk.clone());
        Self {
            db,
            config,
            artifacts,
            scorer,
            metrics_handle,
        }
    }
}
