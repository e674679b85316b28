//! seatmap-import library interface
//!
//! Reconciles externally supplied seating rows against an event's guest list
//! and table layout. Exposes the import pipeline, the background job queue
//! and event maintenance operations for the binary and integration tests.

pub mod db;
pub mod ids;
pub mod import;
pub mod jobs;
pub mod models;
pub mod services;

pub use crate::db::{EventStore, JobStore, MemoryStore, SqliteStore};
pub use crate::ids::{SequentialTableIds, TableIdGenerator, UuidTableIds};
pub use crate::import::{apply_import, parse_rows, preview_import, preview_import_for};
pub use crate::jobs::{get_job_status, recover_jobs, ImportQueue, ImportRequest, ImportSettings};
pub use crate::models::{
    ApplyReport, ColumnMapping, ImportJob, JobStatus, JobStatusView, PreviewReport,
};
