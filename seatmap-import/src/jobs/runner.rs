//! Chunked execution of one import job

use seatmap_common::{Error, Result};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::db::{EventStore, JobStore};
use crate::ids::TableIdGenerator;
use crate::import::{apply_rows, parse_rows, ChunkTally, RawRow};
use crate::models::{ImportJob, JobStatus};

/// Run a pending job to a terminal state
///
/// Returns the final status, or the stored status when the job was not
/// pending or another worker claimed it first. `Err` is reserved for
/// failures that could not be recorded on the job itself (job missing, or
/// the job store rejecting the `running` transition).
pub async fn run_job(
    events: &dyn EventStore,
    jobs: &dyn JobStore,
    ids: &dyn TableIdGenerator,
    job_id: Uuid,
    chunk_size: usize,
) -> Result<JobStatus> {
    let mut job = jobs
        .find_job(job_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Import job not found: {}", job_id)))?;

    if job.status != JobStatus::Pending {
        warn!(
            job_id = %job_id,
            status = job.status.as_str(),
            "Skipping import job that is not pending"
        );
        return Ok(job.status);
    }

    let parsed = parse_rows(&job.csv_text);
    let total = parsed.as_ref().map(|set| set.len()).unwrap_or(0);

    job.start(total)?;
    if !jobs.claim_job(&job).await? {
        warn!(job_id = %job_id, "Import job already claimed, skipping");
        return Ok(jobs
            .find_job(job_id)
            .await?
            .map_or(JobStatus::Running, |stored| stored.status));
    }

    info!(
        job_id = %job_id,
        event_id = %job.event_id,
        rows = total,
        "Import job running"
    );

    let rows = match parsed {
        Ok(set) => set.rows,
        Err(e) => return Ok(fail_job(jobs, job, &e).await),
    };

    if rows.is_empty() {
        let mut next = job.clone();
        next.complete()?;
        return match jobs.save_job(&next).await {
            Ok(()) => Ok(finished(next)),
            Err(e) => Ok(fail_job(jobs, job, &e).await),
        };
    }

    let chunk_size = chunk_size.max(1);
    let chunk_count = rows.len().div_ceil(chunk_size);

    for (index, chunk) in rows.chunks(chunk_size).enumerate() {
        let tally = match process_chunk(events, ids, &job, chunk).await {
            Ok(tally) => tally,
            Err(e) => return Ok(fail_job(jobs, job, &e).await),
        };

        // Advance a copy so `job` keeps the last persisted state
        let mut next = job.clone();
        next.record_chunk(chunk.len(), tally.matched, tally.unmatched)?;
        if index + 1 == chunk_count {
            next.complete()?;
        }

        if let Err(e) = jobs.save_job(&next).await {
            return Ok(fail_job(jobs, job, &e).await);
        }
        job = next;

        debug!(
            job_id = %job_id,
            chunk = index + 1,
            chunks = chunk_count,
            processed = job.processed_rows,
            progress = job.progress,
            tables_added = tally.tables_added,
            "Import chunk committed"
        );
    }

    Ok(finished(job))
}

/// Apply one chunk against a fresh copy of the event and persist it
async fn process_chunk(
    events: &dyn EventStore,
    ids: &dyn TableIdGenerator,
    job: &ImportJob,
    chunk: &[RawRow],
) -> Result<ChunkTally> {
    let mut event = events
        .find_event(&job.event_id)
        .await?
        .ok_or_else(|| Error::NotFound("Event not found".to_string()))?;

    let report = apply_rows(
        &mut event,
        chunk,
        &job.mapping,
        job.create_missing_tables,
        ids,
    );

    event.touch();
    events.save_event(&event).await?;

    Ok(ChunkTally::from(&report))
}

fn finished(job: ImportJob) -> JobStatus {
    info!(
        job_id = %job.id,
        matched = job.matched_count,
        unmatched = job.unmatched_count,
        "Import job done"
    );
    job.status
}

fn failure_message(err: &Error) -> String {
    match err {
        Error::NotFound(msg) | Error::Csv(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Record the failure on the job; already-committed chunks are kept
async fn fail_job(jobs: &dyn JobStore, mut job: ImportJob, err: &Error) -> JobStatus {
    let message = failure_message(err);
    error!(
        job_id = %job.id,
        event_id = %job.event_id,
        processed = job.processed_rows,
        error = %message,
        "Import job failed"
    );

    if let Err(e) = job.fail(message) {
        warn!(job_id = %job.id, error = %e, "Import job is not running");
        return job.status;
    }
    if let Err(e) = jobs.save_job(&job).await {
        error!(job_id = %job.id, error = %e, "Failed to persist import job failure");
    }
    JobStatus::Failed
}
