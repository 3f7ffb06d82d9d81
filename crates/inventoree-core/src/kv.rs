//! The `KeyValueStore` trait, the fixed storage keys, and an in-memory
//! backend.
//!
//! Backends store opaque string values under string keys. Each entity
//! collection is one JSON array under one key; there is no schema version.

use std::{
  collections::HashMap,
  future::Future,
  sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
  },
};

use thiserror::Error;

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Storage keys, namespaced by the application name.
pub mod keys {
  pub const PRODUCTS: &str = "inventoree_products";
  pub const CATEGORIES: &str = "inventoree_categories";
  pub const SUPPLIERS: &str = "inventoree_suppliers";
  pub const SALES: &str = "inventoree_sales";
  pub const STOCK_MOVEMENTS: &str = "inventoree_stock_movements";
  pub const CHAT_MESSAGES: &str = "inventoree_chat_messages";
  pub const CHAT_CONVERSATIONS: &str = "inventoree_chat_conversations";
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable key-value backend.
///
/// Writes replace the whole value for a key. All methods return `Send`
/// futures so stores can be shared across a multi-threaded runtime.
pub trait KeyValueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`, or `None` if the key was never set.
  fn get_item<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Store `value` under `key`, replacing any previous value.
  fn set_item<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove `key`. Removing a missing key is not an error.
  fn remove_item<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── In-memory backend ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryKvError {
  #[error("read rejected for key {0}")]
  ReadRejected(String),

  #[error("write rejected for key {0}")]
  WriteRejected(String),
}

/// A [`KeyValueStore`] that keeps values in a process-local map.
///
/// Cloning is cheap and clones share the same map, so a second store opened
/// over a clone sees everything the first one wrote. Reads and writes can be
/// made to fail on demand, which tests use to exercise the degraded paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
  items:       Arc<Mutex<HashMap<String, String>>>,
  fail_reads:  Arc<AtomicBool>,
  fail_writes: Arc<AtomicBool>,
}

impl MemoryKv {
  pub fn new() -> Self { Self::default() }

  /// Make every subsequent read fail (or succeed again).
  pub fn set_fail_reads(&self, fail: bool) {
    self.fail_reads.store(fail, Ordering::SeqCst);
  }

  /// Make every subsequent write and removal fail (or succeed again).
  pub fn set_fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  /// Synchronous peek at the raw stored value.
  pub fn raw(&self, key: &str) -> Option<String> {
    self
      .items
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .get(key)
      .cloned()
  }
}

impl KeyValueStore for MemoryKv {
  type Error = MemoryKvError;

  async fn get_item(&self, key: &str) -> Result<Option<String>, MemoryKvError> {
    if self.fail_reads.load(Ordering::SeqCst) {
      return Err(MemoryKvError::ReadRejected(key.to_owned()));
    }
    Ok(self.raw(key))
  }

  async fn set_item(&self, key: &str, value: String) -> Result<(), MemoryKvError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(MemoryKvError::WriteRejected(key.to_owned()));
    }
    self
      .items
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(key.to_owned(), value);
    Ok(())
  }

  async fn remove_item(&self, key: &str) -> Result<(), MemoryKvError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(MemoryKvError::WriteRejected(key.to_owned()));
    }
    self
      .items
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(key);
    Ok(())
  }
}
