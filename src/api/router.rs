use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::AppState;
use super::handlers;

pub const API_PREFIX: &str = "/api/v1";

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Health
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/detailed", get(handlers::health::detailed))
        // Fraud scoring
        .route("/ml/models", get(handlers::ml::list_models))
        .route("/ml/predict/transaction", post(handlers::ml::predict))
        .route("/ml/predict/transactions/batch", post(handlers::ml::predict_batch))
        .route("/ml/reload-models", post(handlers::ml::reload_models))
        .route("/ml/risk-config", get(handlers::ml::risk_config))
        // Workers
        .route("/workers", get(handlers::workers::list).post(handlers::workers::create))
        .route(
            "/workers/:id",
            get(handlers::workers::detail)
                .put(handlers::workers::update)
                .delete(handlers::workers::remove),
        )
        .route("/workers/departments/list", get(handlers::workers::departments))
        .route("/workers/stats/summary", get(handlers::workers::stats));

    let cors = cors_layer(&state.config);

    Router::new()
        .nest(API_PREFIX, api)
        .route("/metrics", get(handlers::metrics::render))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}
