//! Background import job state machine
//!
//! PENDING → RUNNING → DONE | FAILED. `Cancelled` is a recognised status for
//! externally cancelled jobs; nothing in this crate transitions into it.
//! Terminal states are one-way: no method moves a job out of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use seatmap_common::{Error, Result};
use uuid::Uuid;

use crate::models::ColumnMapping;

/// Import job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Persisted, waiting for the worker
    Pending,
    /// Worker is processing chunks
    Running,
    /// All rows processed
    Done,
    /// Processing aborted; already-committed chunks are kept
    Failed,
    /// Reserved for external cancellation
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "done" => Ok(JobStatus::Done),
            "failed" => Ok(JobStatus::Failed),
            "cancelled" => Ok(JobStatus::Cancelled),
            other => Err(Error::Internal(format!("Unknown job status: {}", other))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed | JobStatus::Cancelled)
    }
}

/// Persisted record of one background import run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    pub id: Uuid,
    pub event_id: String,
    /// Raw delimited text as submitted
    pub csv_text: String,
    pub mapping: ColumnMapping,
    pub create_missing_tables: bool,
    pub status: JobStatus,
    /// 0-100, non-decreasing; 100 only once the job is done
    pub progress: u8,
    pub total_rows: usize,
    pub processed_rows: usize,
    pub matched_count: usize,
    pub unmatched_count: usize,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// What pollers see
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusView {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub progress: u8,
    pub matched_count: usize,
    pub unmatched_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ImportJob {
    /// Create new pending job
    pub fn new(
        event_id: String,
        csv_text: String,
        mapping: ColumnMapping,
        create_missing_tables: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_id,
            csv_text,
            mapping,
            create_missing_tables,
            status: JobStatus::Pending,
            progress: 0,
            total_rows: 0,
            processed_rows: 0,
            matched_count: 0,
            unmatched_count: 0,
            error_message: None,
            created_at: now,
            updated_at: now,
            started_at: None,
            finished_at: None,
        }
    }

    /// PENDING → RUNNING, progress reset to 0
    pub fn start(&mut self, total_rows: usize) -> Result<()> {
        self.expect_status(JobStatus::Pending, "start")?;
        let now = Utc::now();
        self.status = JobStatus::Running;
        self.progress = 0;
        self.total_rows = total_rows;
        self.processed_rows = 0;
        self.started_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Account for one processed chunk
    ///
    /// Progress is held below 100 while running so that 100 is only ever
    /// observed together with `Done`.
    pub fn record_chunk(&mut self, rows: usize, matched: usize, unmatched: usize) -> Result<()> {
        self.expect_status(JobStatus::Running, "record progress on")?;
        self.processed_rows = (self.processed_rows + rows).min(self.total_rows);
        self.matched_count += matched;
        self.unmatched_count += unmatched;
        let percent = progress_percent(self.processed_rows, self.total_rows).min(99);
        self.progress = self.progress.max(percent);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// RUNNING → DONE, progress 100
    pub fn complete(&mut self) -> Result<()> {
        self.expect_status(JobStatus::Running, "complete")?;
        let now = Utc::now();
        self.status = JobStatus::Done;
        self.progress = 100;
        self.processed_rows = self.total_rows;
        self.finished_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// RUNNING → FAILED, capturing the error message
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.expect_status(JobStatus::Running, "fail")?;
        let now = Utc::now();
        self.status = JobStatus::Failed;
        self.error_message = Some(message.into());
        self.finished_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Check if job is terminal (finished)
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn status_view(&self) -> JobStatusView {
        JobStatusView {
            job_id: self.id,
            status: self.status,
            progress: self.progress,
            matched_count: self.matched_count,
            unmatched_count: self.unmatched_count,
            error_message: self.error_message.clone(),
        }
    }

    fn expect_status(&self, expected: JobStatus, action: &str) -> Result<()> {
        if self.status != expected {
            return Err(Error::InvalidInput(format!(
                "Cannot {} import job {} in state {}",
                action,
                self.id,
                self.status.as_str()
            )));
        }
        Ok(())
    }
}

/// round(processed / total × 100); an empty input counts as complete
pub fn progress_percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let ratio = processed.min(total) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}
