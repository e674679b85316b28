//! Data models for seatmap-import
//!
//! - Column mapping for loosely-structured import rows
//! - Import reports (matched / unmatched rows)
//! - Background import job state machine

pub mod import_job;
pub mod mapping;
pub mod report;

pub use import_job::{ImportJob, JobStatus, JobStatusView};
pub use mapping::ColumnMapping;
pub use report::{ApplyReport, MatchedRow, PreviewReport, UnmatchedReason, UnmatchedRow};
