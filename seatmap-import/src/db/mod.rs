//! Persistence for seatmap-import
//!
//! Events are documents: loaded whole, mutated in memory, saved whole.
//! Saves carry no version check, so two concurrent writers to one event
//! resolve as last-writer-wins; callers serialize work per event if they
//! need consistency.

pub mod events;
pub mod jobs;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use seatmap_common::{Event, Result};
use uuid::Uuid;

use crate::models::{ImportJob, JobStatus};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Event document access
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn find_event(&self, event_id: &str) -> Result<Option<Event>>;

    /// Insert or overwrite the whole document
    async fn save_event(&self, event: &Event) -> Result<()>;

    /// Insert a new document; fails with `InvalidInput` if the id exists
    async fn create_event(&self, event: &Event) -> Result<()>;

    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Returns false when nothing was deleted
    async fn delete_event(&self, event_id: &str) -> Result<bool>;
}

/// Import job record access
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create_job(&self, job: &ImportJob) -> Result<()>;

    /// Update a job; fails with `InvalidInput` once the stored job is
    /// done, failed or cancelled
    async fn save_job(&self, job: &ImportJob) -> Result<()>;

    /// Persist a job that was just started, only if the stored copy is
    /// still pending. Returns whether this caller won the job.
    async fn claim_job(&self, job: &ImportJob) -> Result<bool>;

    async fn find_job(&self, job_id: Uuid) -> Result<Option<ImportJob>>;

    /// Jobs in the given status, oldest first
    async fn list_jobs_with_status(&self, status: JobStatus) -> Result<Vec<ImportJob>>;
}
