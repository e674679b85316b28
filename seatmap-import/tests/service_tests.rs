//! Integration tests for roster, layout and stats operations

mod helpers;

use helpers::{guest, memory_store_with, sample_event, table};
use seatmap_common::Error;
use seatmap_import::services::{
    add_guest, event_stats, remove_guest, replace_layout, self_check_in, set_checked_in,
    update_guest, GuestUpdate, NewGuest,
};
use seatmap_import::EventStore;

// ============================================================================
// Roster
// ============================================================================

#[tokio::test]
async fn test_add_guest_normalizes_and_seats() {
    let store = memory_store_with(&sample_event()).await;

    let added = add_guest(
        store.as_ref(),
        "evt-1",
        NewGuest {
            name: "  Carol ".to_string(),
            email: Some(" Carol@X.com ".to_string()),
            assigned_table: Some("t2".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(added.name, "Carol");
    assert_eq!(added.email.as_deref(), Some("carol@x.com"));
    assert_eq!(added.assigned_table.as_deref(), Some("t2"));
    assert_eq!(added.check_in_code.len(), 16);

    let event = store.find_event("evt-1").await.unwrap().unwrap();
    assert_eq!(event.guests.len(), 3);
    assert!(event.tables[1].has_guest(&added.id));
}

#[tokio::test]
async fn test_add_guest_requires_name() {
    let store = memory_store_with(&sample_event()).await;
    let err = add_guest(store.as_ref(), "evt-1", NewGuest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_update_guest_moves_between_tables() {
    let store = memory_store_with(&sample_event()).await;
    update_guest(
        store.as_ref(),
        "evt-1",
        "g-alice",
        GuestUpdate {
            assigned_table: Some("t1".to_string()),
            ..GuestUpdate::default()
        },
    )
    .await
    .unwrap();

    let moved = update_guest(
        store.as_ref(),
        "evt-1",
        "g-alice",
        GuestUpdate {
            name: Some("Alice Smith".to_string()),
            assigned_table: Some("t2".to_string()),
            ..GuestUpdate::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.name, "Alice Smith");
    assert_eq!(moved.email.as_deref(), Some("alice@x.com"));

    let event = store.find_event("evt-1").await.unwrap().unwrap();
    assert!(!event.tables[0].has_guest("g-alice"));
    assert!(event.tables[1].has_guest("g-alice"));
}

#[tokio::test]
async fn test_update_guest_with_unknown_table_unseats() {
    let store = memory_store_with(&sample_event()).await;
    update_guest(
        store.as_ref(),
        "evt-1",
        "g-bob",
        GuestUpdate {
            assigned_table: Some("t1".to_string()),
            ..GuestUpdate::default()
        },
    )
    .await
    .unwrap();

    let bob = update_guest(
        store.as_ref(),
        "evt-1",
        "g-bob",
        GuestUpdate {
            assigned_table: Some("gone".to_string()),
            ..GuestUpdate::default()
        },
    )
    .await
    .unwrap();

    assert!(bob.assigned_table.is_none());
    let event = store.find_event("evt-1").await.unwrap().unwrap();
    assert!(event.table_of("g-bob").is_none());
}

#[tokio::test]
async fn test_remove_guest_strips_table_references() {
    let mut event = sample_event();
    event.tables[0].assigned_guests = vec!["g-alice".to_string(), "g-bob".to_string()];
    let store = memory_store_with(&event).await;

    remove_guest(store.as_ref(), "evt-1", "g-alice").await.unwrap();

    let event = store.find_event("evt-1").await.unwrap().unwrap();
    assert!(event.guest("g-alice").is_none());
    assert_eq!(event.tables[0].assigned_guests, vec!["g-bob"]);

    let err = remove_guest(store.as_ref(), "evt-1", "g-alice")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_set_checked_in_records_time() {
    let store = memory_store_with(&sample_event()).await;

    let bob = set_checked_in(store.as_ref(), "evt-1", "g-bob", true)
        .await
        .unwrap();
    assert!(bob.checked_in);
    assert!(bob.check_in_time.is_some());

    let bob = set_checked_in(store.as_ref(), "evt-1", "g-bob", false)
        .await
        .unwrap();
    assert!(!bob.checked_in);
    assert!(bob.check_in_time.is_none());
}

#[tokio::test]
async fn test_self_check_in_reports_table() {
    let mut event = sample_event();
    event.tables[1].assigned_guests.push("g-alice".to_string());
    let store = memory_store_with(&event).await;

    let outcome = self_check_in(store.as_ref(), "evt-1", "  ALICE ").await.unwrap();
    assert_eq!(outcome.guest_id, "g-alice");
    assert_eq!(outcome.table_name.as_deref(), Some("Table 2"));

    let event = store.find_event("evt-1").await.unwrap().unwrap();
    assert!(event.guest("g-alice").unwrap().checked_in);

    let err = self_check_in(store.as_ref(), "evt-1", "Mallory")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Layout
// ============================================================================

#[tokio::test]
async fn test_replace_layout_resyncs_guests() {
    let mut event = sample_event();
    event.guests.push(guest("g-carol", "Carol", None));
    event.guests[0].assigned_table = Some("t1".to_string());
    event.tables[0].assigned_guests.push("g-alice".to_string());
    let store = memory_store_with(&event).await;

    let mut head = table("t9", "Head");
    head.assigned_guests = vec!["g-bob".to_string(), "g-carol".to_string()];
    let mut side = table("t10", "Side");
    side.assigned_guests = vec!["g-carol".to_string(), "g-ghost".to_string()];

    let updated = replace_layout(store.as_ref(), "evt-1", vec![head, side])
        .await
        .unwrap();

    assert_eq!(updated.tables.len(), 2);
    assert!(updated.tables[1].assigned_guests.is_empty());
    assert_eq!(updated.guest("g-alice").unwrap().assigned_table, None);
    assert_eq!(
        updated.guest("g-carol").unwrap().assigned_table.as_deref(),
        Some("t9")
    );

    let stored = store.find_event("evt-1").await.unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn test_replace_layout_rejects_invalid_table() {
    let event = sample_event();
    let store = memory_store_with(&event).await;
    let mut bad = table("t1", "Table 1");
    bad.capacity = 0;

    assert!(replace_layout(store.as_ref(), "evt-1", vec![bad]).await.is_err());
    assert_eq!(store.find_event("evt-1").await.unwrap().unwrap(), event);
}

// ============================================================================
// Stats
// ============================================================================

#[tokio::test]
async fn test_event_stats_across_events() {
    let mut first = sample_event();
    first.tables[0].assigned_guests.push("g-alice".to_string());
    first.guests[1].checked_in = true;
    let store = memory_store_with(&first).await;

    let mut second = sample_event();
    second.id = "evt-2".to_string();
    second.guests.truncate(1);
    store.create_event(&second).await.unwrap();

    let stats = event_stats(store.as_ref()).await.unwrap();
    assert_eq!(stats.total_events, 2);
    assert_eq!(stats.total_guests, 3);
    assert_eq!(stats.checked_in, 1);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.seated, 1);
    assert_eq!(stats.unseated, 2);
}
