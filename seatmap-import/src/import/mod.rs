//! Seating import reconciliation
//!
//! raw rows → [`normalizer`] → per-row [`resolver`] (table, then guest) →
//! [`reconciler`] → aggregated report. [`orchestrator`] drives the pipeline
//! in apply and preview mode; the background mode lives in [`crate::jobs`]
//! and reuses the same row classification.

pub mod normalizer;
pub mod orchestrator;
pub mod reconciler;
pub mod resolver;
pub mod rows;

pub use normalizer::{normalize_row, NormalizedRow};
pub use orchestrator::{
    apply_import, apply_rows, load_event, preview_import, preview_import_for, ChunkTally,
};
pub use reconciler::{assign_guest, reconcile_assignment, unseat_guest};
pub use resolver::{find_table, resolve_guest, synthesize_table, table_placement};
pub use rows::{parse_rows, RawRow, RowSet};
