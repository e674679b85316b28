//! Guest list maintenance and check-in

use serde::{Deserialize, Serialize};
use seatmap_common::{ids, Error, Event, Guest, Result};
use tracing::{debug, info};

use crate::db::EventStore;
use crate::import::{assign_guest, load_event, unseat_guest};

/// New guest as entered by an organizer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub assigned_table: Option<String>,
}

/// Edit to an existing guest
///
/// `name` and `email` are left alone when `None`; an empty email clears it.
/// `assigned_table` always applies: `None` unseats the guest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub assigned_table: Option<String>,
}

/// Result of a guest checking themselves in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInOutcome {
    pub guest_id: String,
    /// Name of the table seating the guest, if any
    pub table_name: Option<String>,
}

fn clean_email(email: Option<&str>) -> Option<String> {
    email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}

fn guest_index(event: &Event, guest_id: &str) -> Result<usize> {
    event
        .guests
        .iter()
        .position(|g| g.id == guest_id)
        .ok_or_else(|| Error::NotFound(format!("Guest not found: {}", guest_id)))
}

/// Seat at `table_id` when it names an existing table, otherwise leave unseated
fn seat_if_known(event: &mut Event, guest_id: &str, table_id: Option<&str>) -> Result<()> {
    match table_id {
        Some(table_id) if event.table(table_id).is_some() => {
            assign_guest(event, guest_id, table_id)
        }
        Some(table_id) => {
            debug!(guest_id, table_id, "Ignoring unknown table for guest");
            Ok(())
        }
        None => Ok(()),
    }
}

pub async fn add_guest(store: &dyn EventStore, event_id: &str, new: NewGuest) -> Result<Guest> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Guest name is required".to_string()));
    }

    let mut event = load_event(store, event_id).await?;
    let guest = Guest::new(
        ids::generate().to_string(),
        name.to_string(),
        clean_email(new.email.as_deref()),
    );
    let guest_id = guest.id.clone();
    event.guests.push(guest);
    seat_if_known(&mut event, &guest_id, new.assigned_table.as_deref())?;

    event.touch();
    store.save_event(&event).await?;

    info!(event_id, guest_id = %guest_id, "Guest added");

    let index = guest_index(&event, &guest_id)?;
    Ok(event.guests[index].clone())
}

pub async fn update_guest(
    store: &dyn EventStore,
    event_id: &str,
    guest_id: &str,
    update: GuestUpdate,
) -> Result<Guest> {
    let mut event = load_event(store, event_id).await?;
    let index = guest_index(&event, guest_id)?;

    if let Some(name) = update.name.as_deref() {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Guest name is required".to_string()));
        }
        event.guests[index].name = name.to_string();
    }
    if let Some(email) = update.email.as_deref() {
        event.guests[index].email = clean_email(Some(email));
    }

    unseat_guest(&mut event, guest_id);
    seat_if_known(&mut event, guest_id, update.assigned_table.as_deref())?;

    event.touch();
    store.save_event(&event).await?;

    debug!(event_id, guest_id, "Guest updated");
    Ok(event.guests[index].clone())
}

/// Delete the guest and strip it from every table
pub async fn remove_guest(store: &dyn EventStore, event_id: &str, guest_id: &str) -> Result<()> {
    let mut event = load_event(store, event_id).await?;
    let index = guest_index(&event, guest_id)?;

    event.guests.remove(index);
    for table in &mut event.tables {
        table.assigned_guests.retain(|g| g != guest_id);
    }

    event.touch();
    store.save_event(&event).await?;

    info!(event_id, guest_id, "Guest removed");
    Ok(())
}

pub async fn set_checked_in(
    store: &dyn EventStore,
    event_id: &str,
    guest_id: &str,
    checked_in: bool,
) -> Result<Guest> {
    let mut event = load_event(store, event_id).await?;
    let index = guest_index(&event, guest_id)?;

    let guest = &mut event.guests[index];
    guest.checked_in = checked_in;
    guest.check_in_time = checked_in.then(seatmap_common::time::now);

    event.touch();
    store.save_event(&event).await?;

    Ok(event.guests[index].clone())
}

/// Check a guest in by name and tell them where they sit
pub async fn self_check_in(
    store: &dyn EventStore,
    event_id: &str,
    name: &str,
) -> Result<CheckInOutcome> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return Err(Error::InvalidInput("Name is required".to_string()));
    }

    let mut event = load_event(store, event_id).await?;
    let index = event
        .guests
        .iter()
        .position(|g| g.name.trim().to_lowercase() == wanted)
        .ok_or_else(|| Error::NotFound(format!("No guest named {}", name.trim())))?;

    let guest = &mut event.guests[index];
    guest.checked_in = true;
    guest.check_in_time = Some(seatmap_common::time::now());
    let guest_id = guest.id.clone();

    let table_name = event.table_of(&guest_id).map(|t| t.name.clone());

    event.touch();
    store.save_event(&event).await?;

    info!(event_id, guest_id = %guest_id, "Guest checked in");
    Ok(CheckInOutcome {
        guest_id,
        table_name,
    })
}
