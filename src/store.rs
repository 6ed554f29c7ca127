//! SQLite-backed store for harvested listings.
//!
//! The side database holds one table, `listings (id, title, url)`. The
//! `url` column is treated as the dedupe key by lookup-before-insert
//! logic rather than a storage-level unique constraint.
//!
//! One run maps to one transaction: every staged insert lands on commit
//! or none do. The pool is capped at a single connection, so a run holds
//! one exclusive session and no locking discipline beyond the
//! transaction is needed.

use crate::error::HarvestError;
use crate::models::{Listing, StoredListing};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, instrument};

/// Handle to the side database.
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open the side database and make sure the schema exists.
    ///
    /// # Example URLs
    /// - `sqlite:harvest.db?mode=rwc` - file database, created if absent
    /// - `sqlite::memory:` - in-memory database (ephemeral)
    pub async fn connect(database_url: &str) -> Result<Self, HarvestError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub async fn in_memory() -> Result<Self, HarvestError> {
        Self::connect("sqlite::memory:").await
    }

    /// Create the `listings` table if it is not there yet. Safe to run on
    /// every boot.
    async fn ensure_schema(&self) -> Result<(), HarvestError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS listings (
                id    INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                url   TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("Listings schema ensured");
        Ok(())
    }

    /// Persist a batch of listings, skipping urls the store already has.
    ///
    /// For each listing in order: look up an existing row with the same
    /// url on the open transaction; if found, skip silently; otherwise
    /// stage an insert. The transaction commits once the whole batch has
    /// been processed, so the commit step is all-or-nothing.
    ///
    /// Returns the number of rows actually inserted.
    #[instrument(level = "info", skip_all, fields(batch = batch.len()))]
    pub async fn persist_batch(&self, batch: &[Listing]) -> Result<usize, HarvestError> {
        let mut tx = self.pool.begin().await?;
        let mut staged = 0usize;

        for listing in batch {
            if let Some(url) = listing.url.as_deref() {
                let existing = sqlx::query_as::<_, StoredListing>(
                    "SELECT id, title, url FROM listings WHERE url = ?1",
                )
                .bind(url)
                .fetch_optional(&mut *tx)
                .await?;

                if existing.is_some() {
                    continue;
                }
            }

            sqlx::query("INSERT INTO listings (title, url) VALUES (?1, ?2)")
                .bind(&listing.title)
                .bind(&listing.url)
                .execute(&mut *tx)
                .await?;
            staged += 1;
        }

        tx.commit().await?;
        info!(inserted = staged, skipped = batch.len() - staged, "Committed batch");
        Ok(staged)
    }

    /// Number of listings currently stored.
    pub async fn count(&self) -> Result<i64, HarvestError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM listings")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Every stored listing in insertion order.
    #[cfg(test)]
    pub async fn all_listings(&self) -> Result<Vec<StoredListing>, HarvestError> {
        let rows = sqlx::query_as::<_, StoredListing>("SELECT id, title, url FROM listings ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: Option<&str>, url: &str) -> Listing {
        Listing {
            title: title.map(String::from),
            url: Some(url.to_string()),
        }
    }

    #[tokio::test]
    async fn test_persist_fresh_batch() {
        let store = Store::in_memory().await.unwrap();
        let batch = vec![listing(Some("Title A"), "/a"), listing(Some("Title B"), "/b")];

        let inserted = store.persist_batch(&batch).await.unwrap();
        assert_eq!(inserted, 2);

        let rows = store.all_listings().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title.as_deref(), Some("Title A"));
        assert_eq!(rows[0].url.as_deref(), Some("/a"));
        assert_eq!(rows[1].title.as_deref(), Some("Title B"));
        assert_eq!(rows[1].url.as_deref(), Some("/b"));
    }

    #[tokio::test]
    async fn test_persist_is_idempotent_across_runs() {
        let store = Store::in_memory().await.unwrap();
        let batch = vec![listing(Some("Title A"), "/a"), listing(Some("Title B"), "/b")];

        assert_eq!(store.persist_batch(&batch).await.unwrap(), 2);
        assert_eq!(store.persist_batch(&batch).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_persist_skips_known_urls_only() {
        let store = Store::in_memory().await.unwrap();
        store
            .persist_batch(&[listing(Some("Title A"), "/a")])
            .await
            .unwrap();

        let batch = vec![listing(Some("Title A"), "/a"), listing(Some("Title C"), "/c")];
        let inserted = store.persist_batch(&batch).await.unwrap();
        assert_eq!(inserted, 1);

        let rows = store.all_listings().await.unwrap();
        let urls: Vec<_> = rows.iter().map(|r| r.url.as_deref().unwrap()).collect();
        assert_eq!(urls, vec!["/a", "/c"]);
    }

    #[tokio::test]
    async fn test_duplicate_urls_within_one_batch_insert_once() {
        let store = Store::in_memory().await.unwrap();
        let batch = vec![listing(Some("Title A"), "/a"), listing(Some("copy"), "/a")];

        let inserted = store.persist_batch(&batch).await.unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_null_title_persists() {
        let store = Store::in_memory().await.unwrap();
        let batch = vec![Listing {
            title: None,
            url: Some("/untitled".to_string()),
        }];

        assert_eq!(store.persist_batch(&batch).await.unwrap(), 1);
        let rows = store.all_listings().await.unwrap();
        assert_eq!(rows[0].title, None);
        assert_eq!(rows[0].url.as_deref(), Some("/untitled"));
    }

    #[tokio::test]
    async fn test_empty_batch_persists_nothing() {
        let store = Store::in_memory().await.unwrap();
        assert_eq!(store.persist_batch(&[]).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
