use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgExecutor};

use crate::models::{CreateWorker, SalaryStats, UpdateWorker, Worker, WorkerStats};

/// Page through workers in ascending id order, optionally restricted to one department.
pub async fn list_workers<'e, E: PgExecutor<'e>>(
    executor: E,
    department: Option<&str>,
    skip: i64,
    limit: i64,
) -> anyhow::Result<Vec<Worker>> {
    let workers = sqlx::query_as::<_, Worker>(
        r#"
        SELECT worker_id, first_name, last_name, salary, joining_date, department
        FROM workers
        WHERE ($1::TEXT IS NULL OR department = $1)
        ORDER BY worker_id
        OFFSET $2
        LIMIT $3
        "#,
    )
    .bind(department)
    .bind(skip)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(workers)
}

pub async fn get_worker<'e, E: PgExecutor<'e>>(
    executor: E,
    worker_id: i32,
) -> anyhow::Result<Option<Worker>> {
    let worker = sqlx::query_as::<_, Worker>(
        r#"
        SELECT worker_id, first_name, last_name, salary, joining_date, department
        FROM workers
        WHERE worker_id = $1
        "#,
    )
    .bind(worker_id)
    .fetch_optional(executor)
    .await?;

    Ok(worker)
}

pub async fn create_worker<'e, E: PgExecutor<'e>>(
    executor: E,
    new: &CreateWorker,
) -> anyhow::Result<Worker> {
    let worker = sqlx::query_as::<_, Worker>(
        r#"
        INSERT INTO workers (first_name, last_name, salary, joining_date, department)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING worker_id, first_name, last_name, salary, joining_date, department
        "#,
    )
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(new.salary)
    .bind(new.joining_date)
    .bind(&new.department)
    .fetch_one(executor)
    .await?;

    Ok(worker)
}

/// Apply the supplied fields only. Returns `None` when the id does not exist.
pub async fn update_worker<'e, E: PgExecutor<'e>>(
    executor: E,
    worker_id: i32,
    changes: &UpdateWorker,
) -> anyhow::Result<Option<Worker>> {
    let worker = sqlx::query_as::<_, Worker>(
        r#"
        UPDATE workers
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            salary = COALESCE($4, salary),
            joining_date = COALESCE($5, joining_date),
            department = COALESCE($6, department)
        WHERE worker_id = $1
        RETURNING worker_id, first_name, last_name, salary, joining_date, department
        "#,
    )
    .bind(worker_id)
    .bind(changes.first_name.as_deref())
    .bind(changes.last_name.as_deref())
    .bind(changes.salary)
    .bind(changes.joining_date)
    .bind(changes.department.as_deref())
    .fetch_optional(executor)
    .await?;

    Ok(worker)
}

/// Returns `false` when no row had that id.
pub async fn delete_worker<'e, E: PgExecutor<'e>>(
    executor: E,
    worker_id: i32,
) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM workers WHERE worker_id = $1")
        .bind(worker_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_departments<'e, E: PgExecutor<'e>>(executor: E) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT DISTINCT department FROM workers WHERE department <> '' ORDER BY department",
    )
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|(d,)| d).collect())
}

/// Aggregate salary figures and head count per department.
pub async fn worker_stats(conn: &mut PgConnection) -> anyhow::Result<WorkerStats> {
    let (total_workers, avg, min, max): (i64, Option<Decimal>, Option<i32>, Option<i32>) =
        sqlx::query_as("SELECT COUNT(*), AVG(salary), MIN(salary), MAX(salary) FROM workers")
            .fetch_one(&mut *conn)
            .await?;

    let per_department: Vec<(String, i64)> = sqlx::query_as(
        "SELECT department, COUNT(*) FROM workers GROUP BY department ORDER BY department",
    )
    .fetch_all(&mut *conn)
    .await?;

    let average = avg
        .map(|a| a.round_dp(2))
        .and_then(|a| a.to_f64())
        .unwrap_or(0.0);

    Ok(WorkerStats {
        total_workers,
        salary_stats: SalaryStats {
            average,
            minimum: min.unwrap_or(0),
            maximum: max.unwrap_or(0),
        },
        departments: per_department.into_iter().collect(),
    })
}
