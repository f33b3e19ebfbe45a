use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use metrics::gauge;

use crate::ml::ArtifactProvider;
use crate::AppState;

/// GET /metrics: Prometheus scrape endpoint.
pub async fn render(State(state): State<AppState>) -> impl IntoResponse {
    let loaded = if state.artifacts.is_loaded() { 1.0 } else { 0.0 };
    gauge!("models_loaded").set(loaded);

    let body = state.metrics_handle.render();
    ([(CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}
