//! Import column mapping

use serde::{Deserialize, Serialize};

/// Explicit field → column-name assignments chosen by the organizer
///
/// Every field is optional. An unmapped field (or a mapped column that is
/// absent or blank in a row) falls back to the conventional header names
/// listed in [`crate::import::normalizer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    /// Accepted from the mapping UI; seat order is not reconciled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_index: Option<String>,
}

impl ColumnMapping {
    /// Parse a mapping from its JSON form (`{"guestName": "Full Name", ...}`)
    pub fn from_json(json: &str) -> seatmap_common::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
