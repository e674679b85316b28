//! Import job persistence (SQLite)

use chrono::{DateTime, Utc};
use seatmap_common::{Error, Result};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::models::{ColumnMapping, ImportJob, JobStatus};

const JOB_COLUMNS: &str = r#"
    id, event_id, csv_text, mapping, create_missing_tables, status, progress,
    total_rows, processed_rows, matched_count, unmatched_count, error_message,
    created_at, updated_at, started_at, finished_at
"#;

/// Insert or update an import job
pub async fn save_job(pool: &SqlitePool, job: &ImportJob) -> Result<()> {
    // Prepare all data BEFORE touching the pool
    let mapping = serde_json::to_string(&job.mapping)?;

    let result = sqlx::query(
        r#"
        INSERT INTO import_jobs (
            id, event_id, csv_text, mapping, create_missing_tables, status, progress,
            total_rows, processed_rows, matched_count, unmatched_count, error_message,
            created_at, updated_at, started_at, finished_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            status = excluded.status,
            progress = excluded.progress,
            total_rows = excluded.total_rows,
            processed_rows = excluded.processed_rows,
            matched_count = excluded.matched_count,
            unmatched_count = excluded.unmatched_count,
            error_message = excluded.error_message,
            updated_at = excluded.updated_at,
            started_at = excluded.started_at,
            finished_at = excluded.finished_at
        WHERE import_jobs.status NOT IN ('done', 'failed', 'cancelled')
        "#,
    )
    .bind(job.id.to_string())
    .bind(&job.event_id)
    .bind(&job.csv_text)
    .bind(&mapping)
    .bind(job.create_missing_tables)
    .bind(job.status.as_str())
    .bind(job.progress as i64)
    .bind(job.total_rows as i64)
    .bind(job.processed_rows as i64)
    .bind(job.matched_count as i64)
    .bind(job.unmatched_count as i64)
    .bind(&job.error_message)
    .bind(job.created_at.to_rfc3339())
    .bind(job.updated_at.to_rfc3339())
    .bind(job.started_at.map(|dt| dt.to_rfc3339()))
    .bind(job.finished_at.map(|dt| dt.to_rfc3339()))
    .execute(pool)
    .await?;

    // Conflict with a terminal row: the guarded update matched nothing
    if result.rows_affected() == 0 {
        return Err(Error::InvalidInput(format!(
            "Import job {} is already finished",
            job.id
        )));
    }

    Ok(())
}

/// Move a job from pending to running in one statement
///
/// Returns false when the stored job is no longer pending, meaning another
/// worker claimed it or it already finished.
pub async fn claim_job(pool: &SqlitePool, job: &ImportJob) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE import_jobs
        SET status = ?, progress = ?, total_rows = ?, processed_rows = ?,
            updated_at = ?, started_at = ?
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(job.status.as_str())
    .bind(job.progress as i64)
    .bind(job.total_rows as i64)
    .bind(job.processed_rows as i64)
    .bind(job.updated_at.to_rfc3339())
    .bind(job.started_at.map(|dt| dt.to_rfc3339()))
    .bind(job.id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Load import job by id
pub async fn load_job(pool: &SqlitePool, job_id: Uuid) -> Result<Option<ImportJob>> {
    let query = format!("SELECT {} FROM import_jobs WHERE id = ?", JOB_COLUMNS);
    let row = sqlx::query(&query)
        .bind(job_id.to_string())
        .fetch_optional(pool)
        .await?;

    row.map(|row| job_from_row(&row)).transpose()
}

/// Jobs in one status, oldest first
pub async fn list_jobs_with_status(pool: &SqlitePool, status: JobStatus) -> Result<Vec<ImportJob>> {
    let query = format!(
        "SELECT {} FROM import_jobs WHERE status = ? ORDER BY created_at ASC",
        JOB_COLUMNS
    );
    let rows = sqlx::query(&query)
        .bind(status.as_str())
        .fetch_all(pool)
        .await?;

    rows.iter().map(job_from_row).collect()
}

fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", field, e)))
}

fn parse_optional_timestamp(field: &str, value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value.map(|s| parse_timestamp(field, &s)).transpose()
}

fn job_from_row(row: &SqliteRow) -> Result<ImportJob> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id)
        .map_err(|e| Error::Internal(format!("Failed to parse job id: {}", e)))?;

    let mapping: String = row.get("mapping");
    let mapping: ColumnMapping = serde_json::from_str(&mapping)?;

    let status: String = row.get("status");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(ImportJob {
        id,
        event_id: row.get("event_id"),
        csv_text: row.get("csv_text"),
        mapping,
        create_missing_tables: row.get("create_missing_tables"),
        status: JobStatus::parse(&status)?,
        progress: row.get::<i64, _>("progress").clamp(0, 100) as u8,
        total_rows: row.get::<i64, _>("total_rows") as usize,
        processed_rows: row.get::<i64, _>("processed_rows") as usize,
        matched_count: row.get::<i64, _>("matched_count") as usize,
        unmatched_count: row.get::<i64, _>("unmatched_count") as usize,
        error_message: row.get("error_message"),
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_timestamp("updated_at", &updated_at)?,
        started_at: parse_optional_timestamp("started_at", row.get("started_at"))?,
        finished_at: parse_optional_timestamp("finished_at", row.get("finished_at"))?,
    })
}
