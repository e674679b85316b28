//! Row normalization
//!
//! Pulls guest and table fields out of a loosely-structured record. Each
//! field resolves in order: the explicitly mapped column (when present and
//! not blank), then a fixed list of conventional header names, then "".

use crate::import::RawRow;
use crate::models::ColumnMapping;

/// Conventional headers tried when the guest name is not mapped
pub const GUEST_NAME_KEYS: &[&str] = &["guestName", "Name", "name"];

/// Conventional headers tried when the guest email is not mapped
pub const GUEST_EMAIL_KEYS: &[&str] = &["guestEmail", "Email", "email"];

/// Conventional headers tried when the table id is not mapped
pub const TABLE_ID_KEYS: &[&str] = &["tableId", "table id"];

/// Conventional headers tried when the table name is not mapped
pub const TABLE_NAME_KEYS: &[&str] = &["tableName", "Table Name", "table name"];

/// Trimmed field values extracted from one record ("" when absent)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRow {
    pub guest_name: String,
    pub guest_email: String,
    pub table_id: String,
    pub table_name: String,
}

impl NormalizedRow {
    /// Neither a name nor an email to look the guest up by
    pub fn lacks_guest_key(&self) -> bool {
        self.guest_name.is_empty() && self.guest_email.is_empty()
    }
}

pub fn normalize_row(row: &RawRow, mapping: &ColumnMapping) -> NormalizedRow {
    NormalizedRow {
        guest_name: pick(row, mapping.guest_name.as_deref(), GUEST_NAME_KEYS),
        guest_email: pick(row, mapping.guest_email.as_deref(), GUEST_EMAIL_KEYS),
        table_id: pick(row, mapping.table_id.as_deref(), TABLE_ID_KEYS),
        table_name: pick(row, mapping.table_name.as_deref(), TABLE_NAME_KEYS),
    }
}

fn pick(row: &RawRow, mapped: Option<&str>, fallbacks: &[&str]) -> String {
    mapped
        .into_iter()
        .chain(fallbacks.iter().copied())
        .filter_map(|key| row.get(key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}
