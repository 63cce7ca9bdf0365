//! Photo catalog persistence
//!
//! SQLite-backed record store. Timestamps are stored as fixed-width
//! RFC 3339 text (microsecond precision, `Z` suffix) so lexicographic
//! `ORDER BY` matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use photure_common::api::types::PhotoRecord;
use photure_common::{Error, Result};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_photos_table(&pool).await?;

    Ok(pool)
}

/// In-memory database for tests
///
/// Capped at one connection: each in-memory SQLite connection is its own
/// database, so a larger pool would scatter the tables.
pub async fn connect_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_photos_table(&pool).await?;
    Ok(pool)
}

async fn create_photos_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            id TEXT PRIMARY KEY,
            filename TEXT NOT NULL,
            original_name TEXT NOT NULL,
            content_type TEXT NOT NULL,
            size INTEGER NOT NULL,
            user_id TEXT NOT NULL,
            upload_date TEXT NOT NULL,
            storage_key TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_photos_owner_date ON photos (user_id, upload_date DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Save a photo record
pub async fn insert_photo(pool: &SqlitePool, record: &PhotoRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO photos (
            id, filename, original_name, content_type, size,
            user_id, upload_date, storage_key
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.filename)
    .bind(&record.original_name)
    .bind(&record.content_type)
    .bind(record.size)
    .bind(&record.user_id)
    .bind(format_upload_date(&record.upload_date))
    .bind(&record.storage_key)
    .execute(pool)
    .await?;

    Ok(())
}

/// One page of an owner's records, newest first
pub async fn list_photos(
    pool: &SqlitePool,
    user_id: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<PhotoRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, filename, original_name, content_type, size,
               user_id, upload_date, storage_key
        FROM photos
        WHERE user_id = ?
        ORDER BY upload_date DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_record).collect()
}

/// The owner's full record count, independent of any page bounds
pub async fn count_photos(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Load one record scoped to its owner
pub async fn get_photo(pool: &SqlitePool, id: &str, user_id: &str) -> Result<Option<PhotoRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, filename, original_name, content_type, size,
               user_id, upload_date, storage_key
        FROM photos
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(row_to_record).transpose()
}

/// Delete one record scoped to its owner, returning the storage key it
/// referenced, or `None` if nothing matched
pub async fn delete_photo(pool: &SqlitePool, id: &str, user_id: &str) -> Result<Option<String>> {
    let storage_key: Option<String> =
        sqlx::query_scalar("DELETE FROM photos WHERE id = ? AND user_id = ? RETURNING storage_key")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(storage_key)
}

fn format_upload_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_record(row: SqliteRow) -> Result<PhotoRecord> {
    let upload_date: String = row.get("upload_date");
    let upload_date = DateTime::parse_from_rfc3339(&upload_date)
        .map_err(|e| Error::Internal(format!("Invalid upload_date in database: {}", e)))?
        .with_timezone(&Utc);

    Ok(PhotoRecord {
        id: row.get("id"),
        filename: row.get("filename"),
        original_name: row.get("original_name"),
        content_type: row.get("content_type"),
        size: row.get("size"),
        user_id: row.get("user_id"),
        upload_date,
        storage_key: row.get("storage_key"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(id: &str, user_id: &str, uploaded: DateTime<Utc>) -> PhotoRecord {
        PhotoRecord {
            id: id.to_string(),
            filename: format!("{}.jpg", id),
            original_name: format!("{}.jpg", id),
            content_type: "image/jpeg".to_string(),
            size: 10,
            user_id: user_id.to_string(),
            upload_date: uploaded,
            storage_key: format!("key-{}", id),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let pool = connect_memory().await.unwrap();
        let photo = record("p1", "u1", Utc::now());
        insert_photo(&pool, &photo).await.unwrap();

        let loaded = get_photo(&pool, "p1", "u1").await.unwrap().unwrap();
        assert_eq!(loaded.id, "p1");
        assert_eq!(loaded.storage_key, "key-p1");
        // Microsecond precision survives the round trip
        assert_eq!(
            loaded.upload_date.timestamp_micros(),
            photo.upload_date.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_get_scoped_to_owner() {
        let pool = connect_memory().await.unwrap();
        insert_photo(&pool, &record("p1", "u1", Utc::now()))
            .await
            .unwrap();

        assert!(get_photo(&pool, "p1", "u2").await.unwrap().is_none());
        assert!(get_photo(&pool, "p1", "u1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_pagination() {
        let pool = connect_memory().await.unwrap();
        let base = Utc::now();
        for i in 0..5 {
            insert_photo(
                &pool,
                &record(&format!("p{}", i), "u1", base + Duration::seconds(i)),
            )
            .await
            .unwrap();
        }
        // Another owner's record must not appear
        insert_photo(&pool, &record("other", "u2", base)).await.unwrap();

        let page = list_photos(&pool, "u1", 0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, "p4");
        assert_eq!(page[1].id, "p3");

        let next = list_photos(&pool, "u1", 2, 2).await.unwrap();
        assert_eq!(next[0].id, "p2");
        assert_eq!(next[1].id, "p1");

        assert_eq!(count_photos(&pool, "u1").await.unwrap(), 5);
        assert_eq!(count_photos(&pool, "u2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_returns_storage_key_once() {
        let pool = connect_memory().await.unwrap();
        insert_photo(&pool, &record("p1", "u1", Utc::now()))
            .await
            .unwrap();

        // Wrong owner deletes nothing
        assert!(delete_photo(&pool, "p1", "u2").await.unwrap().is_none());

        let key = delete_photo(&pool, "p1", "u1").await.unwrap();
        assert_eq!(key.as_deref(), Some("key-p1"));

        // Already gone
        assert!(delete_photo(&pool, "p1", "u1").await.unwrap().is_none());
    }
}
