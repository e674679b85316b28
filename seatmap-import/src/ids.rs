//! Identifier generation for synthesized tables

use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of fresh, collision-resistant table ids
pub trait TableIdGenerator: Send + Sync {
    fn next_table_id(&self) -> String;
}

/// `table_<uuid>` ids
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTableIds;

impl TableIdGenerator for UuidTableIds {
    fn next_table_id(&self) -> String {
        seatmap_common::ids::table_id()
    }
}

/// Predictable `<prefix>_1`, `<prefix>_2`, ... ids
///
/// Only unique within one generator; meant for reproducible runs.
#[derive(Debug)]
pub struct SequentialTableIds {
    prefix: String,
    next: AtomicUsize,
}

impl SequentialTableIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicUsize::new(1),
        }
    }
}

impl TableIdGenerator for SequentialTableIds {
    fn next_table_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}_{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialTableIds::new("table");
        assert_eq!(ids.next_table_id(), "table_1");
        assert_eq!(ids.next_table_id(), "table_2");
    }
}
