//! Startup recovery for jobs left behind by a previous process

use seatmap_common::Result;
use tracing::{info, warn};

use crate::db::JobStore;
use crate::jobs::ImportQueue;
use crate::models::JobStatus;

pub const INTERRUPTED_MESSAGE: &str = "Import interrupted by restart";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// `running` jobs marked failed
    pub failed: usize,
    /// `pending` jobs handed back to the worker
    pub requeued: usize,
}

/// Fail interrupted jobs and re-enqueue pending ones
///
/// A job caught mid-run cannot resume safely: its committed chunks are
/// already in the event and replaying them would double-count the totals.
pub async fn recover_jobs(jobs: &dyn JobStore, queue: &ImportQueue) -> Result<RecoveryReport> {
    let mut report = RecoveryReport::default();

    for mut job in jobs.list_jobs_with_status(JobStatus::Running).await? {
        warn!(
            job_id = %job.id,
            processed = job.processed_rows,
            total = job.total_rows,
            "Failing import job interrupted by restart"
        );
        job.fail(INTERRUPTED_MESSAGE)?;
        jobs.save_job(&job).await?;
        report.failed += 1;
    }

    for job in jobs.list_jobs_with_status(JobStatus::Pending).await? {
        queue.enqueue(job.id).await?;
        report.requeued += 1;
    }

    if report.failed > 0 || report.requeued > 0 {
        info!(
            failed = report.failed,
            requeued = report.requeued,
            "Recovered import jobs"
        );
    }

    Ok(report)
}
