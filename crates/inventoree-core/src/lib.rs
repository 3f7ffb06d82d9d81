//! Core types and services for the Inventoree inventory store.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement [`KeyValueStore`]; the [`InventoryStore`] and [`ChatStore`]
//! services hold their collections in memory and write every mutation
//! through to the backend.

pub mod chat;
pub mod error;
pub mod inventory;
pub mod kv;
pub mod model;
pub mod report;

mod collection;

pub use chat::ChatStore;
pub use collection::Saved;
pub use error::{Error, Result};
pub use inventory::{InventoryStore, SalesAnalytics};
pub use kv::{KeyValueStore, MemoryKv};
