//! Handlers for `/sales` and `/stock-movements`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/sales` | Newest first |
//! | `POST` | `/sales` | Body: [`NewSale`], stored as given; 201 |
//! | `POST` | `/sales/checkout` | Body: [`SaleRequest`]; priced from the product; 404 / 422 |
//! | `GET`  | `/stock-movements` | Read-only |
//!
//! Recording a sale never changes the product's stock level.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use inventoree_core::{
  KeyValueStore,
  model::{NewSale, Sale, SaleRequest, StockMovement},
};

use crate::{AppState, error::ApiError};

/// `GET /sales`
pub async fn list<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
) -> Json<Vec<Sale>> {
  Json(state.inventory.recent_sales().await)
}

/// `POST /sales`
pub async fn record<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Json(body): Json<NewSale>,
) -> impl IntoResponse {
  let saved = state.inventory.record_sale(body).await;
  (StatusCode::CREATED, Json(saved))
}

/// `POST /sales/checkout`
pub async fn checkout<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Json(body): Json<SaleRequest>,
) -> Result<impl IntoResponse, ApiError> {
  let saved = state.inventory.sell_product(body).await?;
  tracing::info!(sale = %saved.record.id, total = saved.record.total_amount, "sale recorded");
  Ok((StatusCode::CREATED, Json(saved)))
}

/// `GET /stock-movements`
pub async fn stock_movements<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
) -> Json<Vec<StockMovement>> {
  Json(state.inventory.stock_movements().await)
}
