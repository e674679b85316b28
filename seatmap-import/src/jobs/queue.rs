//! Job submission queue and the single background worker

use std::sync::Arc;

use seatmap_common::config::ImportConfig;
use seatmap_common::{Error, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::{EventStore, JobStore};
use crate::ids::TableIdGenerator;
use crate::jobs::{get_job_status, run_job};
use crate::models::{ColumnMapping, ImportJob, JobStatusView};

/// Worker tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    /// Rows applied per persisted chunk
    pub chunk_size: usize,
    /// Bound on job ids waiting for the worker
    pub queue_capacity: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            chunk_size: 50,
            queue_capacity: 64,
        }
    }
}

impl From<&ImportConfig> for ImportSettings {
    fn from(config: &ImportConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            queue_capacity: config.queue_capacity,
        }
    }
}

/// A background import submission
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub event_id: String,
    pub csv_text: String,
    pub mapping: ColumnMapping,
    pub create_missing_tables: bool,
}

/// Handle for submitting jobs
///
/// Cloning is cheap. The worker stops once every handle is dropped and the
/// backlog is drained.
#[derive(Clone)]
pub struct ImportQueue {
    sender: mpsc::Sender<Uuid>,
    jobs: Arc<dyn JobStore>,
}

impl ImportQueue {
    /// Spawn the worker and return a handle to it
    pub fn start(
        events: Arc<dyn EventStore>,
        jobs: Arc<dyn JobStore>,
        ids: Arc<dyn TableIdGenerator>,
        settings: ImportSettings,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(settings.queue_capacity.max(1));

        let worker = ImportWorker {
            receiver,
            events,
            jobs: Arc::clone(&jobs),
            ids,
            chunk_size: settings.chunk_size.max(1),
        };
        let handle = tokio::spawn(worker.run());

        info!(
            chunk_size = settings.chunk_size,
            queue_capacity = settings.queue_capacity,
            "Import worker started"
        );

        (Self { sender, jobs }, handle)
    }

    /// Persist a pending job and queue it; returns immediately with its id
    ///
    /// The event is not checked here. A job for a missing event fails when
    /// the worker reaches it.
    pub async fn submit(&self, request: ImportRequest) -> Result<Uuid> {
        let job = ImportJob::new(
            request.event_id,
            request.csv_text,
            request.mapping,
            request.create_missing_tables,
        );
        self.jobs.create_job(&job).await?;

        info!(job_id = %job.id, event_id = %job.event_id, "Import job submitted");

        self.enqueue(job.id).await?;
        Ok(job.id)
    }

    /// Queue an already-persisted pending job
    pub async fn enqueue(&self, job_id: Uuid) -> Result<()> {
        self.sender
            .send(job_id)
            .await
            .map_err(|_| Error::Internal("Import worker is not running".to_string()))
    }

    pub async fn status(&self, job_id: Uuid) -> Result<JobStatusView> {
        get_job_status(self.jobs.as_ref(), job_id).await
    }
}

/// Processes queued jobs one at a time, in submission order
pub struct ImportWorker {
    receiver: mpsc::Receiver<Uuid>,
    events: Arc<dyn EventStore>,
    jobs: Arc<dyn JobStore>,
    ids: Arc<dyn TableIdGenerator>,
    chunk_size: usize,
}

impl ImportWorker {
    pub async fn run(mut self) {
        while let Some(job_id) = self.receiver.recv().await {
            let outcome = run_job(
                self.events.as_ref(),
                self.jobs.as_ref(),
                self.ids.as_ref(),
                job_id,
                self.chunk_size,
            )
            .await;

            if let Err(e) = outcome {
                error!(job_id = %job_id, error = %e, "Import job could not run");
            }
        }

        info!("Import worker stopped");
    }
}
