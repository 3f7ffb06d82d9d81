//! Handlers for `/reports/*`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reports/low-stock` | Products at or below their minimum |
//! | `GET`  | `/reports/inventory-value` | `{"totalValue": n}` |
//! | `GET`  | `/reports/sales` | `?days=` (default 30, at most 36600) |
//! | `GET`  | `/reports/categories` | Most valuable first |
//! | `GET`  | `/reports/monthly` | `?months=` (default 6, at most 120) |
//! | `GET`  | `/reports/today` | Today's sales (UTC) |

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::Utc;
use inventoree_core::{
  KeyValueStore, SalesAnalytics,
  inventory::DEFAULT_ANALYTICS_DAYS,
  model::Product,
  report::{CategoryStats, DailySales, MonthlySales},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

const DEFAULT_MONTHS: u32 = 6;
const MAX_MONTHS: u32 = 120;
const MAX_DAYS: u32 = 36_600;

/// `GET /reports/low-stock`
pub async fn low_stock<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
) -> Json<Vec<Product>> {
  Json(state.inventory.low_stock_products().await)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValue {
  pub total_value:   f64,
  pub product_count: usize,
}

/// `GET /reports/inventory-value`
pub async fn inventory_value<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
) -> Json<InventoryValue> {
  let total_value = state.inventory.total_inventory_value().await;
  let product_count = state.inventory.products().await.len();
  Json(InventoryValue { total_value, product_count })
}

#[derive(Debug, Deserialize)]
pub struct SalesParams {
  pub days: Option<u32>,
}

/// `GET /reports/sales[?days=<n>]`
pub async fn sales<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Query(params): Query<SalesParams>,
) -> Result<Json<SalesAnalytics>, ApiError> {
  let days = params.days.unwrap_or(DEFAULT_ANALYTICS_DAYS);
  if days > MAX_DAYS {
    return Err(ApiError::BadRequest(format!("days must be at most {MAX_DAYS}")));
  }
  Ok(Json(state.inventory.sales_analytics(days).await))
}

/// `GET /reports/categories`
pub async fn categories<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
) -> Json<Vec<CategoryStats>> {
  Json(state.inventory.category_breakdown().await)
}

#[derive(Debug, Deserialize)]
pub struct MonthlyParams {
  pub months: Option<u32>,
}

/// `GET /reports/monthly[?months=<n>]`
pub async fn monthly<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Query(params): Query<MonthlyParams>,
) -> Result<Json<Vec<MonthlySales>>, ApiError> {
  let months = params.months.unwrap_or(DEFAULT_MONTHS);
  if months == 0 || months > MAX_MONTHS {
    return Err(ApiError::BadRequest(format!("months must be between 1 and {MAX_MONTHS}")));
  }
  Ok(Json(state.inventory.monthly_sales(months, Utc::now()).await))
}

/// `GET /reports/today`
pub async fn today<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
) -> Json<DailySales> {
  Json(state.inventory.daily_sales(Utc::now()).await)
}
