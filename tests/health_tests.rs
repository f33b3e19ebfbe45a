mod common;

use axum::http::StatusCode;

use common::{build_offline_app, send, temp_model_dir, write_fraud_model};

#[tokio::test]
async fn test_basic_health_check() {
    let app = build_offline_app(&temp_model_dir());

    let (status, json) = send(&app, "GET", "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], "0.1.0-test");
    assert_eq!(json["environment"], "test");
    assert_eq!(json["app_name"], "Fraud Scoring API");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_readiness_check() {
    let app = build_offline_app(&temp_model_dir());

    let (status, json) = send(&app, "GET", "/api/v1/health/ready", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ready");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_liveness_check() {
    let app = build_offline_app(&temp_model_dir());

    let (status, json) = send(&app, "GET", "/api/v1/health/live", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "alive");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_detailed_health_degrades_when_database_unreachable() {
    let dir = temp_model_dir();
    write_fraud_model(&dir);
    let app = build_offline_app(&dir);

    let (status, json) = send(&app, "GET", "/api/v1/health/detailed", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");

    let database = &json["components"]["database"];
    assert_eq!(database["status"], "unhealthy");
    assert!(database["details"]
        .as_str()
        .unwrap()
        .starts_with("Database connection failed"));
    assert_eq!(database["connection_info"]["host"], "127.0.0.1");
    assert_eq!(database["connection_info"]["port"], 1);
    assert_eq!(database["connection_info"]["driver"], "postgres");

    assert_eq!(json["components"]["db_driver"]["status"], "healthy");

    let ml_models = &json["components"]["ml_models"];
    assert_eq!(ml_models["status"], "healthy");
    assert_eq!(ml_models["details"], "Models directory exists with 3 files");
    assert_eq!(ml_models["artifacts_loaded"], true);
}

#[tokio::test]
async fn test_missing_model_dir_is_only_a_warning() {
    let dir = temp_model_dir().join("not-created");
    let app = build_offline_app(&dir);

    let (status, json) = send(&app, "GET", "/api/v1/health/detailed", None).await;

    assert_eq!(status, StatusCode::OK);
    let ml_models = &json["components"]["ml_models"];
    assert_eq!(ml_models["status"], "warning");
    assert_eq!(ml_models["details"], "Models directory does not exist");
    assert_eq!(ml_models["artifacts_loaded"], false);

    // Only the database probe moves the overall status.
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["components"]["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_unreadable_model_dir_is_not_reported_missing() {
    let dir = temp_model_dir();
    let not_a_dir = dir.join("fraud_model.json");
    std::fs::write(&not_a_dir, "{}").unwrap();
    let app = build_offline_app(&not_a_dir);

    let (status, json) = send(&app, "GET", "/api/v1/health/detailed", None).await;

    assert_eq!(status, StatusCode::OK);
    let ml_models = &json["components"]["ml_models"];
    assert_eq!(ml_models["status"], "warning");
    assert_eq!(ml_models["details"], "Models directory cannot be read: not a directory");
}

#[tokio::test]
async fn test_detailed_health_with_live_database() {
    let pool = common::setup_test_db().await;
    let app = common::build_app(pool, &temp_model_dir());

    let (status, json) = send(&app, "GET", "/api/v1/health/detailed", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["components"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = build_offline_app(&temp_model_dir());

    let (status, body) = send(&app, "GET", "/metrics", None).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.as_str().unwrap();
    assert!(body.contains("models_loaded"));
    // Nothing has been scored in this process, so no latency samples exist.
    assert!(!body.contains("prediction_latency_seconds_count"));
}
