//! Integration tests for `SqliteKv`, directly and underneath the stores.

use inventoree_core::{
  ChatStore, InventoryStore, KeyValueStore,
  kv::keys,
  model::{NewCategory, NewProduct, ProductPatch},
};

use crate::SqliteKv;

async fn store() -> SqliteKv {
  SqliteKv::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Raw key-value behaviour ─────────────────────────────────────────────────

#[tokio::test]
async fn missing_key_returns_none() {
  let s = store().await;
  assert!(s.get_item("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn set_then_get_and_overwrite() {
  let s = store().await;
  s.set_item("k", "[1]".into()).await.unwrap();
  assert_eq!(s.get_item("k").await.unwrap().as_deref(), Some("[1]"));

  s.set_item("k", "[1,2]".into()).await.unwrap();
  assert_eq!(s.get_item("k").await.unwrap().as_deref(), Some("[1,2]"));
  assert_eq!(s.keys().await.unwrap(), ["k"]);
}

#[tokio::test]
async fn remove_item_is_idempotent() {
  let s = store().await;
  s.set_item("k", "[]".into()).await.unwrap();
  s.remove_item("k").await.unwrap();
  s.remove_item("k").await.unwrap();
  assert!(s.get_item("k").await.unwrap().is_none());
}

// ─── Through the stores ──────────────────────────────────────────────────────

#[tokio::test]
async fn inventory_writes_one_row_per_collection() {
  let kv = store().await;
  let inventory = InventoryStore::open(kv.clone()).await;
  inventory
    .add_category(NewCategory { name: "Tools".into(), ..Default::default() })
    .await;
  inventory
    .add_product(NewProduct { name: "Hammer".into(), quantity: 3, ..Default::default() })
    .await;

  assert_eq!(kv.keys().await.unwrap(), [keys::CATEGORIES, keys::PRODUCTS]);

  let raw = kv.get_item(keys::PRODUCTS).await.unwrap().unwrap();
  let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
  assert_eq!(json[0]["name"], "Hammer");
}

#[tokio::test]
async fn data_survives_reopening_the_file() {
  let dir  = tempfile::tempdir().unwrap();
  let path = dir.path().join("inventoree.db");

  let created = {
    let inventory = InventoryStore::open(SqliteKv::open(&path).await.unwrap()).await;
    let p = inventory
      .add_product(NewProduct { name: "Saw".into(), quantity: 8, ..Default::default() })
      .await;
    assert!(p.durable);
    let patch = ProductPatch { quantity: Some(7), ..Default::default() };
    inventory.update_product(&p.record.id, patch).await.record.unwrap()
  };

  let reopened = InventoryStore::open(SqliteKv::open(&path).await.unwrap()).await;
  assert_eq!(reopened.products().await, vec![created]);
}

#[tokio::test]
async fn inventory_and_chat_share_one_file() {
  let kv = store().await;
  let inventory = InventoryStore::open(kv.clone()).await;
  let chat = ChatStore::open(kv.clone()).await;

  inventory
    .add_product(NewProduct { name: "Saw".into(), ..Default::default() })
    .await;
  chat.send_message("alice", "bob", "restock saws").await;

  let chat_again = ChatStore::open(kv.clone()).await;
  assert_eq!(chat_again.messages().await.len(), 1);
  let inventory_again = InventoryStore::open(kv).await;
  assert_eq!(inventory_again.products().await.len(), 1);
}
