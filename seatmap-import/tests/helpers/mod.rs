//! Test Helper Utilities
//!
//! Shared fixtures for seatmap-import integration tests

#![allow(dead_code)]

use std::sync::Arc;

use seatmap_common::{Event, Guest, Position, Table, TableShape};
use seatmap_import::import::RawRow;
use seatmap_import::{
    ImportQueue, ImportSettings, MemoryStore, SequentialTableIds, SqliteStore,
};
use tempfile::TempDir;

pub fn guest(id: &str, name: &str, email: Option<&str>) -> Guest {
    Guest::new(id.to_string(), name.to_string(), email.map(str::to_string))
}

pub fn table(id: &str, name: &str) -> Table {
    Table {
        id: id.to_string(),
        name: name.to_string(),
        shape: TableShape::Round,
        capacity: 8,
        position: Position { x: 50.0, y: 50.0 },
        rotation: 0.0,
        assigned_guests: Vec::new(),
    }
}

/// Event with Alice and Bob, tables "Table 1" (t1) and "Table 2" (t2)
pub fn sample_event() -> Event {
    let mut event = Event::new("Spring Gala");
    event.id = "evt-1".to_string();
    event.guests = vec![
        guest("g-alice", "Alice", Some("alice@x.com")),
        guest("g-bob", "Bob", Some("bob@x.com")),
    ];
    event.tables = vec![table("t1", "Table 1"), table("t2", "Table 2")];
    event
}

/// Event with `count` guests named `Guest N` and a single table
pub fn large_event(count: usize) -> Event {
    let mut event = Event::new("Conference Dinner");
    event.id = "evt-large".to_string();
    event.guests = (1..=count)
        .map(|n| guest(&format!("g{}", n), &format!("Guest {}", n), None))
        .collect();
    event.tables = vec![table("t1", "Main")];
    event
}

/// Build a raw row from key/value pairs
pub fn row(pairs: &[(&str, &str)]) -> RawRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// `name,tableName` text with `count` rows, all seated at "Main"
pub fn roster_csv(count: usize) -> String {
    let mut text = String::from("name,tableName\n");
    for n in 1..=count {
        text.push_str(&format!("Guest {},Main\n", n));
    }
    text
}

pub async fn memory_store_with(event: &Event) -> Arc<MemoryStore> {
    use seatmap_import::EventStore;

    let store = Arc::new(MemoryStore::new());
    store.create_event(event).await.unwrap();
    store
}

/// Temporary SQLite store - TempDir must be kept alive for the test
pub async fn create_test_store() -> (TempDir, SqliteStore) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("seatmap.db");
    let pool = seatmap_common::db::init_database(&db_path).await.unwrap();
    (temp_dir, SqliteStore::new(pool))
}

pub fn start_queue(
    store: &Arc<MemoryStore>,
    chunk_size: usize,
) -> (ImportQueue, tokio::task::JoinHandle<()>) {
    ImportQueue::start(
        store.clone(),
        store.clone(),
        Arc::new(SequentialTableIds::new("table")),
        ImportSettings {
            chunk_size,
            queue_capacity: 8,
        },
    )
}

/// Drop the queue handle and wait for the worker to drain its backlog
pub async fn drain(queue: ImportQueue, worker: tokio::task::JoinHandle<()>) {
    drop(queue);
    worker.await.unwrap();
}
