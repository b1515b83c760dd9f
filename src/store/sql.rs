//! Relational page store backed by SQLite.
//!
//! # Schema
//! ```text
//! pages(id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT, content BLOB)
//! ```
//!
//! # Design Decisions
//! - Every statement is parameterized; values are bound, never formatted in
//! - AUTOINCREMENT: ids are unique, increasing and never reused
//! - `create` and `save` both insert a new row (append-only)
//! - `list` fetches all rows in one call so failures never yield partial data

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::page::{Page, PageId};
use crate::store::{PageStore, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content BLOB NOT NULL
)";

#[derive(sqlx::FromRow)]
struct PageRow {
    id: i64,
    title: String,
    content: Vec<u8>,
}

impl From<PageRow> for Page<PageId> {
    fn from(row: PageRow) -> Self {
        Page::new(PageId::new(row.id), row.title, row.content)
    }
}

/// Page store keeping one row per page.
#[derive(Debug, Clone)]
pub struct RelationalStore {
    pool: SqlitePool,
}

impl RelationalStore {
    /// Connect to the database and make sure the schema exists.
    ///
    /// In-memory databases are pinned to one connection that is never
    /// recycled, otherwise each pooled connection would see its own empty
    /// database.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self::from_pool(pool).await?;

        tracing::info!(url = %url, "Relational store opened");
        Ok(store)
    }

    /// Wrap an existing pool, creating the schema if missing.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    async fn insert(&self, title: &str, content: &[u8]) -> Result<PageId, StoreError> {
        let result = sqlx::query("INSERT INTO pages (title, content) VALUES (?, ?)")
            .bind(title)
            .bind(content)
            .execute(&self.pool)
            .await?;

        let id = PageId::new(result.last_insert_rowid());
        tracing::debug!(id = %id, bytes = content.len(), "Page row inserted");
        Ok(id)
    }
}

impl PageStore for RelationalStore {
    type Key = PageId;

    const BACKEND: &'static str = "sqlite";

    async fn get(&self, key: &PageId) -> Result<Page<PageId>, StoreError> {
        let row = sqlx::query_as::<_, PageRow>("SELECT id, title, content FROM pages WHERE id = ?")
            .bind(key.get())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Page::from)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn list(&self) -> Result<Vec<Page<PageId>>, StoreError> {
        let rows = sqlx::query_as::<_, PageRow>("SELECT id, title, content FROM pages ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Page::from).collect())
    }

    async fn create(&self, title: &str, content: &[u8]) -> Result<PageId, StoreError> {
        self.insert(title, content).await
    }

    // Insert-always: saving never updates the row behind `key`.
    async fn save(&self, key: &PageId, title: &str, content: &[u8]) -> Result<PageId, StoreError> {
        tracing::debug!(previous = %key, "Save inserts a new row");
        self.insert(title, content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn memory_store() -> RelationalStore {
        RelationalStore::connect("sqlite::memory:", 5).await.unwrap()
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = memory_store().await;

        let id = store.create("t", b"c").await.unwrap();
        let page = store.get(&id).await.unwrap();
        assert_eq!(page.id, Some(id));
        assert_eq!(page.title, "t");
        assert_eq!(page.content, b"c");
    }

    #[tokio::test]
    async fn test_missing_is_not_found() {
        let store = memory_store().await;
        let err = store.get(&PageId::new(404)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_save_same_title_inserts_twice() {
        let store = memory_store().await;

        let first = store.create("Notes", b"one").await.unwrap();
        let second = store.save(&first, "Notes", b"two").await.unwrap();
        assert_ne!(first, second);
        assert!(second > first);

        assert_eq!(store.get(&first).await.unwrap().content, b"one");
        assert_eq!(store.get(&second).await.unwrap().content, b"two");

        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![Some(first), Some(second)]);
    }

    #[tokio::test]
    async fn test_titles_are_bound_not_interpolated() {
        let store = memory_store().await;

        let hostile = "x'); DROP TABLE pages; --";
        let id = store.create(hostile, b"c").await.unwrap();
        assert_eq!(store.get(&id).await.unwrap().title, hostile);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_database_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("pages.db").display());

        let id = {
            let store = RelationalStore::connect(&url, 2).await.unwrap();
            store.create("Kept", b"body").await.unwrap()
        };

        let reopened = RelationalStore::connect(&url, 2).await.unwrap();
        assert_eq!(reopened.get(&id).await.unwrap().title, "Kept");
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("pages.db").display());
        let store = Arc::new(RelationalStore::connect(&url, 4).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let content = format!("content {i}");
                (i, store.create("Same", content.as_bytes()).await.unwrap())
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            let (i, id) = handle.await.unwrap();
            let page = store.get(&id).await.unwrap();
            assert_eq!(page.content, format!("content {i}").into_bytes());
            ids.push(id);
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }
}
