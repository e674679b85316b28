//! Assignment reconciliation
//!
//! Within one event a guest sits at no more than one table. Every assignment
//! first strips the guest from all tables, then seats it at the target
//! once. Capacity is advisory and never checked here.

use seatmap_common::{Error, Event, Result, Table};

/// Seat `guest_id` at `table_id`, removing it from every other table
///
/// Idempotent. Fails with `NotFound` (leaving `tables` untouched) when the
/// target table does not exist.
pub fn reconcile_assignment(guest_id: &str, table_id: &str, tables: &mut [Table]) -> Result<()> {
    let target = tables
        .iter()
        .position(|t| t.id == table_id)
        .ok_or_else(|| Error::NotFound(format!("Table not found: {}", table_id)))?;

    seat_at(guest_id, target, tables);
    Ok(())
}

fn seat_at(guest_id: &str, target: usize, tables: &mut [Table]) {
    for table in tables.iter_mut() {
        table.assigned_guests.retain(|g| g != guest_id);
    }
    tables[target].assigned_guests.push(guest_id.to_string());
}

/// Index-based [`assign_guest`] for callers that resolved both records
/// from this same event
pub(crate) fn seat_resolved(event: &mut Event, guest_index: usize, table_index: usize) {
    let guest_id = event.guests[guest_index].id.clone();
    seat_at(&guest_id, table_index, &mut event.tables);
    event.guests[guest_index].assigned_table = Some(event.tables[table_index].id.clone());
}

/// Seat a guest and record the table on the guest as well
pub fn assign_guest(event: &mut Event, guest_id: &str, table_id: &str) -> Result<()> {
    if event.guest(guest_id).is_none() {
        return Err(Error::NotFound(format!("Guest not found: {}", guest_id)));
    }
    reconcile_assignment(guest_id, table_id, &mut event.tables)?;
    if let Some(guest) = event.guest_mut(guest_id) {
        guest.assigned_table = Some(table_id.to_string());
    }
    Ok(())
}

/// Remove a guest from every table and clear its assignment
pub fn unseat_guest(event: &mut Event, guest_id: &str) {
    for table in event.tables.iter_mut() {
        table.assigned_guests.retain(|g| g != guest_id);
    }
    if let Some(guest) = event.guest_mut(guest_id) {
        guest.assigned_table = None;
    }
}
