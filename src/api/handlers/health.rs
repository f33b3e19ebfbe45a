use std::io::ErrorKind;
use std::path::Path;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::db;
use crate::ml::ArtifactProvider;
use crate::AppState;

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// GET /api/v1/health: identity only, no dependency checks.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": timestamp(),
        "version": state.config.version,
        "environment": state.config.environment,
        "app_name": state.config.app_name,
    }))
}

/// GET /api/v1/health/ready
pub async fn readiness() -> Json<Value> {
    Json(json!({ "status": "ready", "timestamp": timestamp() }))
}

/// GET /api/v1/health/live
pub async fn liveness() -> Json<Value> {
    Json(json!({ "status": "alive", "timestamp": timestamp() }))
}

/// GET /api/v1/health/detailed: always 200; failures are reported in the body.
///
/// Only a failed database probe downgrades the overall status. Driver and
/// model directory problems surface as component warnings.
pub async fn detailed(State(state): State<AppState>) -> Json<Value> {
    let mut status = "healthy";

    let options = state.db.connect_options();
    let connection_info = json!({
        "host": options.get_host(),
        "port": options.get_port(),
        "database": options.get_database(),
        "driver": "postgres",
    });

    let database = match db::ping(&state.db).await {
        Ok(()) => json!({
            "status": "healthy",
            "details": "Database connection successful",
            "connection_info": connection_info,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Health probe: database unreachable");
            status = "degraded";
            json!({
                "status": "unhealthy",
                "details": format!("Database connection failed: {e}"),
                "connection_info": connection_info,
            })
        }
    };

    let db_driver = if state.db.is_closed() {
        json!({
            "status": "warning",
            "driver": "postgres",
            "details": "Connection pool is closed",
        })
    } else {
        json!({
            "status": "healthy",
            "driver": "postgres",
            "pool_size": state.db.size(),
            "idle_connections": state.db.num_idle(),
        })
    };

    let loaded = state.artifacts.is_loaded();
    let ml_models = match inspect_model_dir(state.artifacts.dir()).await {
        ModelDir::Files(count) => json!({
            "status": "healthy",
            "details": format!("Models directory exists with {count} files"),
            "artifacts_loaded": loaded,
        }),
        ModelDir::Missing => json!({
            "status": "warning",
            "details": "Models directory does not exist",
            "artifacts_loaded": loaded,
        }),
        ModelDir::Unreadable(reason) => json!({
            "status": "warning",
            "details": format!("Models directory cannot be read: {reason}"),
            "artifacts_loaded": loaded,
        }),
    };

    Json(json!({
        "status": status,
        "timestamp": timestamp(),
        "version": state.config.version,
        "environment": state.config.environment,
        "app_name": state.config.app_name,
        "components": {
            "database": database,
            "db_driver": db_driver,
            "ml_models": ml_models,
        },
    }))
}

enum ModelDir {
    Missing,
    Unreadable(String),
    Files(usize),
}

/// Whether the model directory exists and how many regular files it holds.
async fn inspect_model_dir(dir: &Path) -> ModelDir {
    match tokio::fs::metadata(dir).await {
        Err(e) if e.kind() == ErrorKind::NotFound => return ModelDir::Missing,
        Err(e) => return ModelDir::Unreadable(e.to_string()),
        Ok(meta) if !meta.is_dir() => return ModelDir::Unreadable("not a directory".into()),
        Ok(_) => {}
    }

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => return ModelDir::Unreadable(e.to_string()),
    };

    let mut count = 0;
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                    count += 1;
                }
            }
            Ok(None) => break,
            Err(e) => return ModelDir::Unreadable(e.to_string()),
        }
    }

    ModelDir::Files(count)
}
