//! Event document persistence (SQLite)

use seatmap_common::{Error, Event, Result};
use sqlx::{Row, SqlitePool};

/// Insert or overwrite an event document
pub async fn save_event(pool: &SqlitePool, event: &Event) -> Result<()> {
    // Prepare all data BEFORE touching the pool
    let document = serde_json::to_string(event)?;

    sqlx::query(
        r#"
        INSERT INTO events (id, name, document, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            document = excluded.document,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&event.id)
    .bind(&event.name)
    .bind(&document)
    .bind(event.created_at.to_rfc3339())
    .bind(event.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a new event document, rejecting a duplicate id
pub async fn create_event(pool: &SqlitePool, event: &Event) -> Result<()> {
    let document = serde_json::to_string(event)?;

    let result = sqlx::query(
        r#"
        INSERT INTO events (id, name, document, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(id) DO NOTHING
        "#,
    )
    .bind(&event.id)
    .bind(&event.name)
    .bind(&document)
    .bind(event.created_at.to_rfc3339())
    .bind(event.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::InvalidInput(format!("Event already exists: {}", event.id)));
    }
    Ok(())
}

/// Load event document by id
pub async fn load_event(pool: &SqlitePool, event_id: &str) -> Result<Option<Event>> {
    let row = sqlx::query("SELECT document FROM events WHERE id = ?")
        .bind(event_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let document: String = row.get("document");
            Ok(Some(serde_json::from_str(&document)?))
        }
        None => Ok(None),
    }
}

/// All events, newest first
pub async fn list_events(pool: &SqlitePool) -> Result<Vec<Event>> {
    let rows = sqlx::query("SELECT document FROM events ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|row| {
            let document: String = row.get("document");
            serde_json::from_str(&document).map_err(Error::from)
        })
        .collect()
}

/// Delete event document
pub async fn delete_event(pool: &SqlitePool, event_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(event_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
