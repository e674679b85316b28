//! Delimited text → ordered, string-keyed records

use csv::{ReaderBuilder, Trim};
use seatmap_common::{Error, Result};
use std::collections::BTreeMap;

/// One input record keyed by column header
pub type RawRow = BTreeMap<String, String>;

/// Parsed input with the headers discovered in the header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse CSV text with a header row
///
/// Blank lines and records whose cells are all empty are skipped. Short
/// records leave their trailing columns absent; surplus cells are dropped.
pub fn parse_rows(text: &str) -> Result<RowSet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Csv(format!("read headers: {}", e)))?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::Csv(format!("read record {}: {}", index + 1, e)))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut row = RawRow::new();
        for (key, value) in headers.iter().zip(record.iter()) {
            if key.is_empty() {
                continue;
            }
            row.insert(key.clone(), value.to_string());
        }
        rows.push(row);
    }

    Ok(RowSet { headers, rows })
}
