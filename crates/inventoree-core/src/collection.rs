//! A persisted, in-memory entity collection.
//!
//! Each collection owns one storage key. Mutations take the write lock, change
//! the vector in place, and write the whole vector through to the backend
//! before the lock is released, so writes to a key land in issue order.

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::kv::KeyValueStore;

/// The result of a mutation, paired with whether the backend acknowledged it.
///
/// When `durable` is `false` the in-memory state already reflects the
/// mutation, but storage still holds the previous value for that collection
/// until the next successful write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Saved<T> {
  pub record:  T,
  pub durable: bool,
}

impl<T> Saved<T> {
  pub(crate) fn new(record: T, durable: bool) -> Self { Self { record, durable } }
}

impl<T> Saved<Option<T>> {
  /// `None` when the mutation matched no record.
  pub fn transpose(self) -> Option<Saved<T>> {
    let durable = self.durable;
    self.record.map(|record| Saved { record, durable })
  }
}

pub(crate) struct Collection<T> {
  key:   &'static str,
  items: RwLock<Vec<T>>,
}

impl<T> Collection<T>
where
  T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
  pub(crate) fn new(key: &'static str) -> Self {
    Self { key, items: RwLock::new(Vec::new()) }
  }

  /// Replace the in-memory contents with whatever the backend holds.
  ///
  /// A missing key leaves the collection empty. Read and decode failures are
  /// logged and also leave it empty.
  pub(crate) async fn load<B: KeyValueStore>(&self, backend: &B) {
    let items = match backend.get_item(self.key).await {
      Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => items,
        Err(e) => {
          tracing::warn!(key = self.key, error = %e, "stored collection is malformed; starting empty");
          Vec::new()
        }
      },
      Ok(None) => Vec::new(),
      Err(e) => {
        tracing::warn!(key = self.key, error = %e, "failed to read collection; starting empty");
        Vec::new()
      }
    };
    tracing::debug!(key = self.key, count = items.len(), "collection loaded");
    *self.items.write().await = items;
  }

  pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Vec<T>> { self.items.read().await }

  pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> { self.items.write().await }

  pub(crate) async fn snapshot(&self) -> Vec<T> { self.items.read().await.clone() }

  /// Write `items` through to the backend. Returns whether the write landed.
  ///
  /// Callers pass the contents of a write guard they still hold.
  pub(crate) async fn flush<B: KeyValueStore>(&self, backend: &B, items: &[T]) -> bool {
    let raw = match serde_json::to_string(items) {
      Ok(raw) => raw,
      Err(e) => {
        tracing::error!(key = self.key, error = %e, "failed to encode collection");
        return false;
      }
    };
    match backend.set_item(self.key, raw).await {
      Ok(()) => {
        tracing::debug!(key = self.key, count = items.len(), "collection persisted");
        true
      }
      Err(e) => {
        tracing::error!(key = self.key, error = %e, "failed to persist collection");
        false
      }
    }
  }
}
