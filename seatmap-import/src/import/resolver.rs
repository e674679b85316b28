//! Guest and table resolution against an event's collections
//!
//! All matching is first-match-wins in collection order.

use seatmap_common::{Guest, Position, Table, TableShape};

/// Seat count given to synthesized tables
pub const DEFAULT_TABLE_CAPACITY: u32 = 10;

// Synthesized table placement grid
const PLACEMENT_ORIGIN: f64 = 50.0;
const PLACEMENT_STEP: usize = 80;
const PLACEMENT_ROW_WIDTH: usize = 500;
const TABLES_PER_ROW: usize = 6;

fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Find a guest by email, then by name (both case-insensitive, trimmed)
///
/// An email match wins regardless of the name. Empty inputs are skipped.
pub fn resolve_guest<'a>(guests: &'a [Guest], name: &str, email: &str) -> Option<&'a Guest> {
    let by_email = if email.trim().is_empty() {
        None
    } else {
        guests.iter().find(|g| {
            g.email
                .as_deref()
                .is_some_and(|e| !e.trim().is_empty() && same_text(e, email))
        })
    };

    by_email.or_else(|| {
        if name.trim().is_empty() {
            return None;
        }
        guests
            .iter()
            .find(|g| !g.name.trim().is_empty() && same_text(&g.name, name))
    })
}

/// Index of the table matching `table_id` exactly, else `table_name`
/// case-insensitively
///
/// An id that matches nothing still falls back to the name.
pub fn find_table(tables: &[Table], table_id: &str, table_name: &str) -> Option<usize> {
    let by_id = if table_id.is_empty() {
        None
    } else {
        tables.iter().position(|t| t.id == table_id)
    };

    by_id.or_else(|| {
        if table_name.trim().is_empty() {
            return None;
        }
        tables
            .iter()
            .position(|t| !t.name.trim().is_empty() && same_text(&t.name, table_name))
    })
}

/// Canvas position for the table appended after `existing` tables
///
/// x steps across a bounded band, y moves down one row every six tables,
/// so the same table count always yields the same coordinates.
pub fn table_placement(existing: usize) -> Position {
    Position {
        x: PLACEMENT_ORIGIN + ((existing * PLACEMENT_STEP) % PLACEMENT_ROW_WIDTH) as f64,
        y: PLACEMENT_ORIGIN + ((existing / TABLES_PER_ROW) * PLACEMENT_STEP) as f64,
    }
}

/// New empty round table named after an import row
pub fn synthesize_table(id: String, name: &str, existing: usize) -> Table {
    Table {
        id,
        name: name.trim().to_string(),
        shape: TableShape::Round,
        capacity: DEFAULT_TABLE_CAPACITY,
        position: table_placement(existing),
        rotation: 0.0,
        assigned_guests: Vec::new(),
    }
}
