//! SQLite-backed stores

use async_trait::async_trait;
use seatmap_common::{Event, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{events, jobs, EventStore, JobStore};
use crate::models::{ImportJob, JobStatus};

/// Event and job store over one connection pool
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap a pool whose tables were created by `seatmap_common::db::init_database`
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl EventStore for SqliteStore {
    async fn find_event(&self, event_id: &str) -> Result<Option<Event>> {
        events::load_event(&self.pool, event_id).await
    }

    async fn save_event(&self, event: &Event) -> Result<()> {
        events::save_event(&self.pool, event).await
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        events::create_event(&self.pool, event).await
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        events::list_events(&self.pool).await
    }

    async fn delete_event(&self, event_id: &str) -> Result<bool> {
        events::delete_event(&self.pool, event_id).await
    }
}

#[async_trait]
impl JobStore for SqliteStore {
    async fn create_job(&self, job: &ImportJob) -> Result<()> {
        jobs::save_job(&self.pool, job).await
    }

    async fn save_job(&self, job: &ImportJob) -> Result<()> {
        jobs::save_job(&self.pool, job).await
    }

    async fn claim_job(&self, job: &ImportJob) -> Result<bool> {
        jobs::claim_job(&self.pool, job).await
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<ImportJob>> {
        jobs::load_job(&self.pool, job_id).await
    }

    async fn list_jobs_with_status(&self, status: JobStatus) -> Result<Vec<ImportJob>> {
        jobs::list_jobs_with_status(&self.pool, status).await
    }
}
