//! [`SqliteKv`]: the SQLite implementation of [`KeyValueStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use inventoree_core::KeyValueStore;

use crate::{Error, Result, schema::SCHEMA};

/// A key-value store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted, so the
/// inventory and chat stores can share one file.
#[derive(Clone)]
pub struct SqliteKv {
  conn: tokio_rusqlite::Connection,
}

impl SqliteKv {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store. Useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// All stored keys, sorted.
  pub async fn keys(&self) -> Result<Vec<String>> {
    let keys = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(keys)
  }
}

// ─── KeyValueStore impl ──────────────────────────────────────────────────────

impl KeyValueStore for SqliteKv {
  type Error = Error;

  async fn get_item(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();

    let value = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(value)
  }

  async fn set_item(&self, key: &str, value: String) -> Result<()> {
    let key    = key.to_owned();
    let at_str = Utc::now().to_rfc3339();
    let bytes  = value.len();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET
             value      = excluded.value,
             updated_at = excluded.updated_at",
          rusqlite::params![key, value, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::trace!(bytes, "kv row written");
    Ok(())
  }

  async fn remove_item(&self, key: &str) -> Result<()> {
    let key = key.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}
