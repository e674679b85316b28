//! Import orchestration (apply and preview modes)
//!
//! Both modes run every row through the same resolution and classification
//! steps so a preview predicts the outcome of an apply over the same event
//! state. Classification order per row:
//!
//! 1. no guest name and no email → "Missing guest name/email" (no lookups)
//! 2. table unresolved (after optional creation) → "Table not found"
//! 3. guest unresolved → "Guest not found"
//! 4. otherwise matched

use seatmap_common::{Error, Event, Result};
use tracing::{debug, info, trace};

use crate::db::EventStore;
use crate::ids::TableIdGenerator;
use crate::import::normalizer::{normalize_row, NormalizedRow};
use crate::import::reconciler::seat_resolved;
use crate::import::resolver::{find_table, resolve_guest, synthesize_table};
use crate::import::RawRow;
use crate::models::{
    ApplyReport, ColumnMapping, MatchedRow, PreviewReport, UnmatchedReason, UnmatchedRow,
};

/// Per-chunk counters for background jobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkTally {
    pub matched: usize,
    pub unmatched: usize,
    pub tables_added: usize,
}

impl From<&ApplyReport> for ChunkTally {
    fn from(report: &ApplyReport) -> Self {
        Self {
            matched: report.matched.len(),
            unmatched: report.unmatched.len(),
            tables_added: report.tables_added,
        }
    }
}

/// Row lookups against the event as it stands, before any mutation
struct Lookup {
    row: NormalizedRow,
    guest: Option<usize>,
    table: Option<usize>,
}

fn lookup(
    event: &Event,
    raw: &RawRow,
    mapping: &ColumnMapping,
) -> std::result::Result<Lookup, UnmatchedReason> {
    let row = normalize_row(raw, mapping);
    if row.lacks_guest_key() {
        return Err(UnmatchedReason::MissingGuestKey);
    }

    let table = find_table(&event.tables, &row.table_id, &row.table_name);
    let guest = resolve_guest(&event.guests, &row.guest_name, &row.guest_email)
        .and_then(|found| event.guests.iter().position(|g| g.id == found.id));

    Ok(Lookup { row, guest, table })
}

/// Table is evaluated before guest
fn classify(lookup: &Lookup) -> std::result::Result<(usize, usize), UnmatchedReason> {
    let table = lookup.table.ok_or(UnmatchedReason::TableNotFound)?;
    let guest = lookup.guest.ok_or(UnmatchedReason::GuestNotFound)?;
    Ok((guest, table))
}

fn matched_row(event: &Event, guest: usize, table: usize) -> MatchedRow {
    MatchedRow {
        guest_id: event.guests[guest].id.clone(),
        guest_name: event.guests[guest].name.clone(),
        table_id: event.tables[table].id.clone(),
        table_name: event.tables[table].name.clone(),
    }
}

fn unmatched(raw: &RawRow, reason: UnmatchedReason) -> UnmatchedRow {
    trace!(reason = %reason, "Row unmatched");
    UnmatchedRow {
        row: raw.clone(),
        reason,
    }
}

/// Resolve and apply every row to `event` in memory
///
/// Missing tables are synthesized (and appended to `event.tables`) when
/// `create_missing_tables` is set and the row names a table. Nothing is
/// persisted.
pub fn apply_rows(
    event: &mut Event,
    rows: &[RawRow],
    mapping: &ColumnMapping,
    create_missing_tables: bool,
    ids: &dyn TableIdGenerator,
) -> ApplyReport {
    let mut report = ApplyReport::default();

    for raw in rows {
        let mut found = match lookup(event, raw, mapping) {
            Ok(found) => found,
            Err(reason) => {
                report.unmatched.push(unmatched(raw, reason));
                continue;
            }
        };

        if found.table.is_none() && create_missing_tables && !found.row.table_name.is_empty() {
            let table = synthesize_table(ids.next_table_id(), &found.row.table_name, event.tables.len());
            debug!(table_id = %table.id, table_name = %table.name, "Created missing table");
            event.tables.push(table);
            found.table = Some(event.tables.len() - 1);
            report.tables_added += 1;
        }

        match classify(&found) {
            Ok((guest, table)) => {
                seat_resolved(event, guest, table);
                let row = matched_row(event, guest, table);
                trace!(guest_id = %row.guest_id, table_id = %row.table_id, "Row matched");
                report.matched.push(row);
            }
            Err(reason) => report.unmatched.push(unmatched(raw, reason)),
        }
    }

    report
}

/// Dry run against a read-only event snapshot
///
/// Unresolved table names are collected into `tables_needed`, deduplicated
/// case-insensitively (matching how table names are looked up), keeping the
/// spelling of the first appearance.
pub fn preview_import(event: &Event, rows: &[RawRow], mapping: &ColumnMapping) -> PreviewReport {
    let mut report = PreviewReport::default();

    for raw in rows {
        let found = match lookup(event, raw, mapping) {
            Ok(found) => found,
            Err(reason) => {
                report.unmatched.push(unmatched(raw, reason));
                continue;
            }
        };

        if found.table.is_none() && !found.row.table_name.is_empty() {
            let name = &found.row.table_name;
            let known = report
                .tables_needed
                .iter()
                .any(|n| n.to_lowercase() == name.to_lowercase());
            if !known {
                report.tables_needed.push(name.clone());
            }
        }

        match classify(&found) {
            Ok((guest, table)) => report.matched.push(matched_row(event, guest, table)),
            Err(reason) => report.unmatched.push(unmatched(raw, reason)),
        }
    }

    info!(
        event_id = %event.id,
        matched = report.matched.len(),
        unmatched = report.unmatched.len(),
        tables_needed = report.tables_needed.len(),
        "Import preview complete"
    );

    report
}

/// Load an event or fail with `NotFound`
pub async fn load_event(store: &dyn EventStore, event_id: &str) -> Result<Event> {
    store
        .find_event(event_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Event not found: {}", event_id)))
}

/// Preview against the stored event; never writes
pub async fn preview_import_for(
    store: &dyn EventStore,
    event_id: &str,
    rows: &[RawRow],
    mapping: &ColumnMapping,
) -> Result<PreviewReport> {
    let snapshot = load_event(store, event_id).await?;
    Ok(preview_import(&snapshot, rows, mapping))
}

/// Apply rows to `event` and persist it once at the end
///
/// A save failure is returned as-is; `event` then holds the unsaved
/// in-memory result.
pub async fn apply_import(
    store: &dyn EventStore,
    event: &mut Event,
    rows: &[RawRow],
    mapping: &ColumnMapping,
    create_missing_tables: bool,
    ids: &dyn TableIdGenerator,
) -> Result<ApplyReport> {
    info!(
        event_id = %event.id,
        rows = rows.len(),
        create_missing_tables,
        "Applying import"
    );

    let report = apply_rows(event, rows, mapping, create_missing_tables, ids);

    event.touch();
    store.save_event(event).await?;

    info!(
        event_id = %event.id,
        matched = report.matched.len(),
        unmatched = report.unmatched.len(),
        tables_added = report.tables_added,
        "Import applied"
    );

    Ok(report)
}
