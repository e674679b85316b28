//! Event document models
//!
//! An [`Event`] is the aggregate root: it exclusively owns its guest list and
//! table list as embedded collections. The guest → table relation is stored
//! redundantly (`Guest::assigned_table` and `Table::assigned_guests`); code
//! that mutates one side must keep the other in step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seating table shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    #[default]
    Round,
    Rectangular,
}

/// Canvas coordinates of a table (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Seating table embedded in an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub shape: TableShape,
    /// Advisory seat count, never enforced on assignment
    pub capacity: u32,
    #[serde(flatten)]
    pub position: Position,
    #[serde(default)]
    pub rotation: f64,
    /// Guest ids seated at this table, each at most once
    #[serde(default)]
    pub assigned_guests: Vec<String>,
}

impl Table {
    /// Check whether the guest id is seated here
    pub fn has_guest(&self, guest_id: &str) -> bool {
        self.assigned_guests.iter().any(|g| g == guest_id)
    }

    /// Number of seated guests beyond capacity (0 when within capacity)
    pub fn overflow(&self) -> usize {
        self.assigned_guests
            .len()
            .saturating_sub(self.capacity as usize)
    }
}

/// Guest embedded in an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_table: Option<String>,
    #[serde(default)]
    pub checked_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<DateTime<Utc>>,
    /// Code rendered into the guest's check-in QR image
    #[serde(default)]
    pub check_in_code: String,
}

impl Guest {
    /// Create an unseated, not-yet-checked-in guest
    pub fn new(id: String, name: String, email: Option<String>) -> Self {
        Self {
            id,
            name,
            email,
            assigned_table: None,
            checked_in: false,
            check_in_time: None,
            check_in_code: crate::ids::check_in_code(),
        }
    }
}

/// Event aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u32>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub guests: Vec<Guest>,
    #[serde(default = "crate::time::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "crate::time::now")]
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Create an empty event with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        let now = crate::time::now();
        Self {
            id: crate::ids::generate().to_string(),
            name: name.into(),
            date: String::new(),
            time: String::new(),
            location: String::new(),
            max_capacity: None,
            tables: Vec::new(),
            guests: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn guest(&self, guest_id: &str) -> Option<&Guest> {
        self.guests.iter().find(|g| g.id == guest_id)
    }

    pub fn guest_mut(&mut self, guest_id: &str) -> Option<&mut Guest> {
        self.guests.iter_mut().find(|g| g.id == guest_id)
    }

    pub fn table(&self, table_id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    /// Table whose `assigned_guests` contains the guest, if any
    pub fn table_of(&self, guest_id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.has_guest(guest_id))
    }

    /// Bump `updated_at` before persisting
    pub fn touch(&mut self) {
        self.updated_at = crate::time::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_json_uses_flat_coordinates() {
        let table = Table {
            id: "t1".to_string(),
            name: "Table 1".to_string(),
            shape: TableShape::Rectangular,
            capacity: 8,
            position: Position { x: 50.0, y: 130.0 },
            rotation: 0.0,
            assigned_guests: vec!["g1".to_string()],
        };

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["x"], 50.0);
        assert_eq!(json["y"], 130.0);
        assert_eq!(json["shape"], "rectangular");
        assert_eq!(json["assignedGuests"][0], "g1");
    }

    #[test]
    fn test_event_document_defaults_missing_collections() {
        let event: Event = serde_json::from_str(r#"{"id": "e1", "name": "Gala"}"#).unwrap();
        assert!(event.tables.is_empty());
        assert!(event.guests.is_empty());
    }

    #[test]
    fn test_table_of_finds_seating() {
        let mut event = Event::new("Gala");
        event.tables.push(Table {
            id: "t1".to_string(),
            name: "Head".to_string(),
            shape: TableShape::Round,
            capacity: 1,
            position: Position::default(),
            rotation: 0.0,
            assigned_guests: vec!["g1".to_string(), "g2".to_string()],
        });

        assert_eq!(event.table_of("g2").map(|t| t.id.as_str()), Some("t1"));
        assert!(event.table_of("g3").is_none());
        assert_eq!(event.tables[0].overflow(), 1);
    }
}
