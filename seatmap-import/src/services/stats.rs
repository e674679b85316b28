//! Dashboard counters across all events

use serde::Serialize;
use seatmap_common::{Event, Result};

use crate::db::EventStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total_events: usize,
    pub total_guests: usize,
    pub checked_in: usize,
    /// Guests not yet checked in
    pub pending: usize,
    /// Guests listed by some table
    pub seated: usize,
    pub unseated: usize,
}

pub fn collect_stats(events: &[Event]) -> EventStats {
    let mut stats = EventStats {
        total_events: events.len(),
        ..EventStats::default()
    };

    for event in events {
        for guest in &event.guests {
            stats.total_guests += 1;
            if guest.checked_in {
                stats.checked_in += 1;
            }
            if event.table_of(&guest.id).is_some() {
                stats.seated += 1;
            }
        }
    }

    stats.pending = stats.total_guests - stats.checked_in;
    stats.unseated = stats.total_guests - stats.seated;
    stats
}

pub async fn event_stats(store: &dyn EventStore) -> Result<EventStats> {
    let events = store.list_events().await?;
    Ok(collect_stats(&events))
}
