//! Router tests against stores over the in-memory backend.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use inventoree_core::{ChatStore, InventoryStore, MemoryKv};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, api_router};

async fn make_state() -> (AppState<MemoryKv>, MemoryKv) {
  let kv = MemoryKv::new();
  let state = AppState {
    inventory: Arc::new(InventoryStore::open(kv.clone()).await),
    chat:      Arc::new(ChatStore::open(kv.clone()).await),
  };
  (state, kv)
}

async fn call(
  state:  &AppState<MemoryKv>,
  method: &str,
  uri:    &str,
  body:   Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(state.clone())
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn widget(category: &str, supplier: &str) -> Value {
  json!({
    "name": "Widget",
    "sku": "W1",
    "description": "",
    "categoryId": category,
    "supplierId": supplier,
    "quantity": 10,
    "minQuantity": 2,
    "price": 9.99,
    "cost": 5
  })
}

// ── Products ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn product_crud_roundtrip() {
  let (state, _) = make_state().await;

  let (status, created) = call(&state, "POST", "/products", Some(widget("c1", "s1"))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["durable"], true);
  let id = created["record"]["id"].as_str().unwrap().to_owned();

  let (status, fetched) = call(&state, "GET", &format!("/products/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["quantity"], 10);

  let (status, patched) =
    call(&state, "PATCH", &format!("/products/{id}"), Some(json!({ "quantity": 1 }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(patched["record"]["quantity"], 1);
  assert_eq!(patched["record"]["name"], "Widget");

  let (_, low) = call(&state, "GET", "/reports/low-stock", None).await;
  assert_eq!(low.as_array().unwrap().len(), 1);

  let (status, _) = call(&state, "DELETE", &format!("/products/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) = call(&state, "DELETE", &format!("/products/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_missing_product_is_404() {
  let (state, _) = make_state().await;
  let (status, body) =
    call(&state, "PATCH", "/products/nope", Some(json!({ "quantity": 1 }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn product_without_name_is_rejected() {
  let (state, _) = make_state().await;
  let mut body = widget("c1", "s1");
  body["name"] = json!("  ");
  let (status, _) = call(&state, "POST", "/products", Some(body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_search_by_query() {
  let (state, _) = make_state().await;
  call(&state, "POST", "/products", Some(widget("c1", "s1"))).await;

  let (_, hits) = call(&state, "GET", "/products?q=w1", None).await;
  assert_eq!(hits.as_array().unwrap().len(), 1);
  let (_, misses) = call(&state, "GET", "/products?q=gadget", None).await;
  assert!(misses.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn failed_write_is_reported_as_not_durable() {
  let (state, kv) = make_state().await;
  kv.set_fail_writes(true);

  let (status, created) = call(&state, "POST", "/products", Some(widget("c1", "s1"))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["durable"], false);

  let (_, listed) = call(&state, "GET", "/products", None).await;
  assert_eq!(listed.as_array().unwrap().len(), 1);
}

// ── Categories and suppliers ─────────────────────────────────────────────────

#[tokio::test]
async fn deleting_referenced_category_is_409() {
  let (state, _) = make_state().await;
  let (_, category) =
    call(&state, "POST", "/categories", Some(json!({ "name": "Tools" }))).await;
  let cid = category["record"]["id"].as_str().unwrap().to_owned();
  call(&state, "POST", "/products", Some(widget(&cid, "s1"))).await;

  let (status, body) = call(&state, "DELETE", &format!("/categories/{cid}"), None).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert!(body["error"].as_str().unwrap().contains("1 product"));

  let (_, stats) = call(&state, "GET", "/reports/categories", None).await;
  assert_eq!(stats[0]["productCount"], 1);
  assert_eq!(stats[0]["color"], "#2563eb");
}

#[tokio::test]
async fn supplier_update_and_delete() {
  let (state, _) = make_state().await;
  let (_, supplier) =
    call(&state, "POST", "/suppliers", Some(json!({ "name": "Acme" }))).await;
  let sid = supplier["record"]["id"].as_str().unwrap().to_owned();

  let (status, patched) = call(
    &state,
    "PATCH",
    &format!("/suppliers/{sid}"),
    Some(json!({ "contactPerson": "Jo" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(patched["record"]["contactPerson"], "Jo");

  let (status, _) = call(&state, "DELETE", &format!("/suppliers/{sid}"), None).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) = call(&state, "GET", &format!("/suppliers/{sid}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Sales and reports ────────────────────────────────────────────────────────

#[tokio::test]
async fn checkout_prices_sale_and_leaves_stock() {
  let (state, _) = make_state().await;
  let (_, created) = call(&state, "POST", "/products", Some(widget("c1", "s1"))).await;
  let id = created["record"]["id"].as_str().unwrap().to_owned();

  let (status, sale) = call(
    &state,
    "POST",
    "/sales/checkout",
    Some(json!({ "productId": id, "quantity": 2, "userId": "u1" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(sale["record"]["unitPrice"], 9.99);
  assert_eq!(sale["record"]["totalAmount"], 9.99 * 2.0);

  let (_, product) = call(&state, "GET", &format!("/products/{id}"), None).await;
  assert_eq!(product["quantity"], 10);

  let (_, analytics) = call(&state, "GET", "/reports/sales?days=7", None).await;
  assert_eq!(analytics["totalSales"], 1);
  assert_eq!(analytics["totalQuantitySold"], 2);

  let (_, today) = call(&state, "GET", "/reports/today", None).await;
  assert_eq!(today["salesCount"], 1);
}

#[tokio::test]
async fn checkout_rejections() {
  let (state, _) = make_state().await;
  let (status, _) = call(
    &state,
    "POST",
    "/sales/checkout",
    Some(json!({ "productId": "missing", "quantity": 1, "userId": "u1" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (_, created) = call(&state, "POST", "/products", Some(widget("c1", "s1"))).await;
  let id = created["record"]["id"].as_str().unwrap().to_owned();
  let (status, body) = call(
    &state,
    "POST",
    "/sales/checkout",
    Some(json!({ "productId": id, "quantity": 11, "userId": "u1" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert!(body["error"].as_str().unwrap().contains("available: 10"));
}

#[tokio::test]
async fn raw_sale_and_empty_reports() {
  let (state, _) = make_state().await;

  let (_, value) = call(&state, "GET", "/reports/inventory-value", None).await;
  assert_eq!(value["totalValue"], 0.0);

  let (_, analytics) = call(&state, "GET", "/reports/sales", None).await;
  assert_eq!(analytics["averageOrderValue"], 0.0);

  let (status, _) = call(
    &state,
    "POST",
    "/sales",
    Some(json!({
      "productId": "p1", "quantity": 3, "unitPrice": 10, "totalAmount": 30, "userId": "u1"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (_, sales) = call(&state, "GET", "/sales", None).await;
  assert_eq!(sales[0]["totalAmount"], 30.0);
  let (_, movements) = call(&state, "GET", "/stock-movements", None).await;
  assert!(movements.as_array().unwrap().is_empty());

  let (_, months) = call(&state, "GET", "/reports/monthly", None).await;
  let months = months.as_array().unwrap();
  assert_eq!(months.len(), 6);
  assert_eq!(months[5]["salesCount"], 1);

  let (status, _) = call(&state, "GET", "/reports/monthly?months=0", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sales_report_bounds_days() {
  let (state, _) = make_state().await;
  let (status, _) = call(&state, "GET", "/reports/sales?days=4294967295", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, analytics) = call(&state, "GET", "/reports/sales?days=36600", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(analytics["totalSales"], 0);
}

#[tokio::test]
async fn huge_recorded_quantities_do_not_break_reports() {
  let (state, _) = make_state().await;
  for _ in 0..2 {
    let (status, _) = call(
      &state,
      "POST",
      "/sales",
      Some(json!({
        "productId": "p1", "quantity": i64::MAX, "unitPrice": 1, "totalAmount": 1, "userId": "u1"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }

  let (status, analytics) = call(&state, "GET", "/reports/sales", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(analytics["totalSales"], 2);
  assert_eq!(analytics["totalQuantitySold"], i64::MAX);
}

// ── Chat ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_flow() {
  let (state, _) = make_state().await;
  let send = |from: &str, to: &str, text: &str| {
    json!({ "senderId": from, "receiverId": to, "message": text })
  };

  let (status, _) = call(&state, "POST", "/chat/messages", Some(send("alice", "bob", "hi"))).await;
  assert_eq!(status, StatusCode::CREATED);
  call(&state, "POST", "/chat/messages", Some(send("bob", "alice", "yo"))).await;
  call(&state, "POST", "/chat/messages", Some(send("alice", "bob", "more"))).await;

  let (status, _) = call(&state, "POST", "/chat/messages", Some(send("alice", "bob", " "))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, unread) = call(&state, "GET", "/chat/users/bob/unread", None).await;
  assert_eq!(unread["unread"], 2);

  let (_, convs) = call(&state, "GET", "/chat/users/bob/conversations", None).await;
  assert_eq!(convs[0]["id"], "alice-bob");
  assert_eq!(convs[0]["lastMessage"]["message"], "more");

  let (_, thread) = call(&state, "GET", "/chat/conversations/alice-bob/messages", None).await;
  assert_eq!(thread.as_array().unwrap().len(), 3);

  let (_, marked) = call(
    &state,
    "POST",
    "/chat/conversations/alice-bob/read",
    Some(json!({ "userId": "bob" })),
  )
  .await;
  assert_eq!(marked["record"], 2);

  let (_, unread) =
    call(&state, "GET", "/chat/users/bob/unread?conversation=alice-bob", None).await;
  assert_eq!(unread["unread"], 0);
}
