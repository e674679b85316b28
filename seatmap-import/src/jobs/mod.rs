//! Background import jobs
//!
//! A submission persists a `pending` [`ImportJob`](crate::models::ImportJob)
//! and hands its id to a single sequential worker. The worker runs the rows
//! in fixed-size chunks, saving the event and then the job after each one, so
//! pollers see progress and committed chunks survive a crash. There is no
//! rollback: a failed chunk ends the job and earlier chunks stay applied.

pub mod queue;
pub mod recovery;
pub mod runner;

use seatmap_common::{Error, Result};
use uuid::Uuid;

use crate::db::JobStore;
use crate::models::JobStatusView;

pub use queue::{ImportQueue, ImportRequest, ImportSettings, ImportWorker};
pub use recovery::{recover_jobs, RecoveryReport, INTERRUPTED_MESSAGE};
pub use runner::run_job;

/// Poll a job's status by id
pub async fn get_job_status(jobs: &dyn JobStore, job_id: Uuid) -> Result<JobStatusView> {
    let job = jobs
        .find_job(job_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Import job not found: {}", job_id)))?;

    tracing::debug!(job_id = %job_id, status = job.status.as_str(), "Status query");
    Ok(job.status_view())
}
