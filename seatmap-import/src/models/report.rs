//! Import result reports

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::import::RawRow;

/// Row resolved to a guest and a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRow {
    pub guest_id: String,
    pub guest_name: String,
    pub table_id: String,
    pub table_name: String,
}

/// Why a row could not be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnmatchedReason {
    MissingGuestKey,
    TableNotFound,
    GuestNotFound,
}

impl UnmatchedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnmatchedReason::MissingGuestKey => "Missing guest name/email",
            UnmatchedReason::TableNotFound => "Table not found",
            UnmatchedReason::GuestNotFound => "Guest not found",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        [
            UnmatchedReason::MissingGuestKey,
            UnmatchedReason::TableNotFound,
            UnmatchedReason::GuestNotFound,
        ]
        .into_iter()
        .find(|r| r.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for UnmatchedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Reasons travel as their human-readable label
impl Serialize for UnmatchedReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UnmatchedReason {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        UnmatchedReason::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown unmatched reason: {}", label)))
    }
}

/// Row that could not be applied, with its raw record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedRow {
    pub row: RawRow,
    pub reason: UnmatchedReason,
}

/// Outcome of applying an import to an event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub matched: Vec<MatchedRow>,
    pub unmatched: Vec<UnmatchedRow>,
    pub tables_added: usize,
}

/// Outcome of a dry-run import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewReport {
    pub matched: Vec<MatchedRow>,
    pub unmatched: Vec<UnmatchedRow>,
    /// Distinct missing table names, in order of first appearance
    pub tables_needed: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_serializes_as_label() {
        let json = serde_json::to_string(&UnmatchedReason::GuestNotFound).unwrap();
        assert_eq!(json, "\"Guest not found\"");

        let back: UnmatchedReason = serde_json::from_str("\"table not found\"").unwrap();
        assert_eq!(back, UnmatchedReason::TableNotFound);

        assert!(serde_json::from_str::<UnmatchedReason>("\"nope\"").is_err());
    }

    #[test]
    fn test_apply_report_field_names() {
        let report = ApplyReport {
            tables_added: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tablesAdded"], 2);
        assert!(json["matched"].as_array().unwrap().is_empty());
    }
}
