use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::ml::{ArtifactProvider, COLUMNS_FILE, MODEL_FILE, SCALER_FILE};
use crate::models::{BatchResult, BatchTransactionRequest, FraudPrediction, Transaction};
use crate::AppState;

/// GET /api/v1/ml/models: artifact load status.
pub async fn list_models(State(state): State<AppState>) -> Json<Value> {
    let current = state.artifacts.current();

    Json(json!({
        "models": {
            "fraud_detection": {
                "loaded": current.is_some(),
                "model_dir": state.artifacts.dir().display().to_string(),
                "model_file": MODEL_FILE,
                "scaler_file": SCALER_FILE,
                "columns_file": COLUMNS_FILE,
                "feature_columns": current.as_ref().map(|set| set.columns().len()),
            }
        },
        "message": "ML models status",
    }))
}

/// POST /api/v1/ml/predict/transaction
pub async fn predict(
    State(state): State<AppState>,
    Json(txn): Json<Transaction>,
) -> Result<Json<FraudPrediction>, AppError> {
    let prediction = state.scorer.score(&txn)?;
    Ok(Json(prediction))
}

/// POST /api/v1/ml/predict/transactions/batch
pub async fn predict_batch(
    State(state): State<AppState>,
    Json(body): Json<BatchTransactionRequest>,
) -> Result<Json<BatchResult>, AppError> {
    let result = state.scorer.score_batch(&body.transactions)?;
    Ok(Json(result))
}

/// POST /api/v1/ml/reload-models: re-read artifacts from disk.
pub async fn reload_models(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let artifacts = Arc::clone(&state.artifacts);
    let result = tokio::task::spawn_blocking(move || artifacts.reload())
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let message = match &result.error {
        None => "Models reloaded successfully".to_string(),
        Some(e) => format!("Failed to load models: {e}"),
    };

    Ok(Json(json!({
        "success": result.loaded,
        "message": message,
    })))
}

/// GET /api/v1/ml/risk-config: active thresholds and labels.
pub async fn risk_config(State(state): State<AppState>) -> Json<Value> {
    let risk = state.scorer.risk_config();

    Json(json!({
        "risk_thresholds": {
            "low_threshold": risk.low_threshold,
            "high_threshold": risk.high_threshold,
            "explanation": risk.explanation(),
        },
        "risk_labels": {
            "normal": risk.normal_label,
            "moderate": risk.moderate_label,
            "high": risk.high_label,
        },
        "environment_variables": {
            "FRAUD_RISK_LOW_THRESHOLD": format!("Set to {} (default: 0.3)", risk.low_threshold),
            "FRAUD_RISK_HIGH_THRESHOLD": format!("Set to {} (default: 0.7)", risk.high_threshold),
            "FRAUD_RISK_NORMAL_LABEL": format!("Set to '{}' (default: 'Normal / No Risk')", risk.normal_label),
            "FRAUD_RISK_MODERATE_LABEL": format!("Set to '{}' (default: 'Moderate Risk (Verify)')", risk.moderate_label),
            "FRAUD_RISK_HIGH_LABEL": format!("Set to '{}' (default: 'High Risk (Avoid)')", risk.high_label),
        },
    }))
}
