//! Whole-layout replacement from the seating editor

use std::collections::HashSet;

use seatmap_common::{Error, Event, Guest, Result, Table};
use tracing::{info, warn};

use crate::db::EventStore;
use crate::import::load_event;

/// Validate a submitted table list and clean up its guest references
///
/// Each guest id survives at most once across the whole layout, at its
/// first occurrence in table order. Ids that are not on the guest list are
/// dropped.
pub fn normalize_layout(guests: &[Guest], mut tables: Vec<Table>) -> Result<Vec<Table>> {
    let mut table_ids = HashSet::new();
    for table in &tables {
        if table.name.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "Table {} has no name",
                table.id
            )));
        }
        if table.capacity < 1 {
            return Err(Error::InvalidInput(format!(
                "Table {} must seat at least one guest",
                table.name
            )));
        }
        if !table_ids.insert(table.id.as_str()) {
            return Err(Error::InvalidInput(format!(
                "Duplicate table id: {}",
                table.id
            )));
        }
    }

    let known: HashSet<&str> = guests.iter().map(|g| g.id.as_str()).collect();
    let mut seated: HashSet<String> = HashSet::new();
    let mut dropped = 0usize;

    for table in &mut tables {
        table.assigned_guests.retain(|guest_id| {
            let keep = known.contains(guest_id.as_str()) && seated.insert(guest_id.clone());
            if !keep {
                dropped += 1;
            }
            keep
        });
    }

    if dropped > 0 {
        warn!(dropped, "Dropped duplicate or unknown guest ids from layout");
    }

    Ok(tables)
}

/// Point every guest's `assigned_table` at the table that lists it
fn resync_guests(event: &mut Event) {
    let Event { guests, tables, .. } = event;
    for guest in guests.iter_mut() {
        guest.assigned_table = tables
            .iter()
            .find(|t| t.has_guest(&guest.id))
            .map(|t| t.id.clone());
    }
}

pub async fn replace_layout(
    store: &dyn EventStore,
    event_id: &str,
    tables: Vec<Table>,
) -> Result<Event> {
    let mut event = load_event(store, event_id).await?;

    event.tables = normalize_layout(&event.guests, tables)?;
    resync_guests(&mut event);

    event.touch();
    store.save_event(&event).await?;

    info!(event_id, tables = event.tables.len(), "Layout replaced");
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatmap_common::{Position, TableShape};

    fn guest(id: &str) -> Guest {
        Guest::new(id.to_string(), id.to_uppercase(), None)
    }

    fn table(id: &str, capacity: u32, guests: &[&str]) -> Table {
        Table {
            id: id.to_string(),
            name: format!("Table {}", id),
            shape: TableShape::Round,
            capacity,
            position: Position::default(),
            rotation: 0.0,
            assigned_guests: guests.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_first_table_keeps_duplicate_guest() {
        let guests = vec![guest("g1"), guest("g2")];
        let tables = vec![table("t1", 4, &["g1", "g1"]), table("t2", 4, &["g2", "g1"])];

        let tables = normalize_layout(&guests, tables).unwrap();

        assert_eq!(tables[0].assigned_guests, vec!["g1"]);
        assert_eq!(tables[1].assigned_guests, vec!["g2"]);
    }

    #[test]
    fn test_unknown_guest_ids_dropped() {
        let guests = vec![guest("g1")];
        let tables = normalize_layout(&guests, vec![table("t1", 4, &["ghost", "g1"])]).unwrap();
        assert_eq!(tables[0].assigned_guests, vec!["g1"]);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = normalize_layout(&[], vec![table("t1", 0, &[])]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut blank = table("t1", 2, &[]);
        blank.name = "  ".to_string();
        assert!(normalize_layout(&[], vec![blank]).is_err());
    }

    #[test]
    fn test_resync_clears_stale_assignment() {
        let mut event = Event::new("Gala");
        let mut g1 = guest("g1");
        g1.assigned_table = Some("gone".to_string());
        event.guests = vec![g1, guest("g2")];
        event.tables = vec![table("t1", 2, &["g2"])];

        resync_guests(&mut event);

        assert_eq!(event.guests[0].assigned_table, None);
        assert_eq!(event.guests[1].assigned_table.as_deref(), Some("t1"));
    }
}
