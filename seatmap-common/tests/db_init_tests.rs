//! Database initialization tests

use seatmap_common::db::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_init_creates_file_and_tables() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("sub").join("seatmap.db");

    let pool = init_database(&db_path).await.unwrap();
    assert!(db_path.exists());

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(tables.contains(&"events".to_string()));
    assert!(tables.contains(&"import_jobs".to_string()));
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("seatmap.db");

    let pool = init_database(&db_path).await.unwrap();
    sqlx::query(
        "INSERT INTO events (id, name, document, created_at, updated_at) VALUES ('e1', 'Gala', '{}', 'x', 'x')",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    let pool = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
