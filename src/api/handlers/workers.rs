use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::db::worker_repo;
use crate::errors::AppError;
use crate::models::{CreateWorker, ListWorkersQuery, UpdateWorker, Worker, WorkerStats};
use crate::AppState;

// Every handler runs inside its own transaction. Returning early through `?`
// drops the transaction, which rolls it back and releases the connection.

fn not_found(worker_id: i32) -> AppError {
    AppError::NotFound(format!("Worker with ID {worker_id} not found"))
}

/// GET /api/v1/workers: paginated list, optionally filtered by department
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListWorkersQuery>,
) -> Result<Json<Vec<Worker>>, AppError> {
    query.validate()?;

    let mut tx = state.db.begin().await?;
    let workers =
        worker_repo::list_workers(&mut *tx, query.department_filter(), query.skip, query.limit)
            .await?;
    tx.commit().await?;

    Ok(Json(workers))
}

/// GET /api/v1/workers/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(worker_id): Path<i32>,
) -> Result<Json<Worker>, AppError> {
    let mut tx = state.db.begin().await?;
    let worker = worker_repo::get_worker(&mut *tx, worker_id)
        .await?
        .ok_or_else(|| not_found(worker_id))?;
    tx.commit().await?;

    Ok(Json(worker))
}

/// POST /api/v1/workers
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateWorker>,
) -> Result<(StatusCode, Json<Worker>), AppError> {
    body.validate()?;

    let mut tx = state.db.begin().await?;
    let worker = worker_repo::create_worker(&mut *tx, &body).await?;
    tx.commit().await?;

    tracing::info!(
        worker_id = worker.worker_id,
        department = %worker.department,
        "Worker created"
    );

    Ok((StatusCode::CREATED, Json(worker)))
}

/// PUT /api/v1/workers/{id}: only the supplied fields change
pub async fn update(
    State(state): State<AppState>,
    Path(worker_id): Path<i32>,
    Json(body): Json<UpdateWorker>,
) -> Result<Json<Worker>, AppError> {
    body.validate()?;

    let mut tx = state.db.begin().await?;
    let worker = if body.is_empty() {
        worker_repo::get_worker(&mut *tx, worker_id).await?
    } else {
        worker_repo::update_worker(&mut *tx, worker_id, &body).await?
    }
    .ok_or_else(|| not_found(worker_id))?;
    tx.commit().await?;

    tracing::info!(worker_id, "Worker updated");

    Ok(Json(worker))
}

/// DELETE /api/v1/workers/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(worker_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.begin().await?;
    if !worker_repo::delete_worker(&mut *tx, worker_id).await? {
        return Err(not_found(worker_id));
    }
    tx.commit().await?;

    tracing::info!(worker_id, "Worker deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/workers/departments/list
pub async fn departments(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let mut tx = state.db.begin().await?;
    let departments = worker_repo::list_departments(&mut *tx).await?;
    tx.commit().await?;

    Ok(Json(departments))
}

/// GET /api/v1/workers/stats/summary
pub async fn stats(State(state): State<AppState>) -> Result<Json<WorkerStats>, AppError> {
    let mut tx = state.db.begin().await?;
    let stats = worker_repo::worker_stats(&mut *tx).await?;
    tx.commit().await?;

    Ok(Json(stats))
}
