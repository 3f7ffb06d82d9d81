//! Handlers for `/products`, `/categories` and `/suppliers`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/products` | Optional `?q=` over name and SKU |
//! | `POST`   | `/products` | Body: [`NewProduct`]; 201 |
//! | `GET`    | `/products/{id}` | 404 if not found |
//! | `PATCH`  | `/products/{id}` | Body: [`ProductPatch`]; 404 if not found |
//! | `DELETE` | `/products/{id}` | 404 if not found |
//!
//! `/categories` and `/suppliers` follow the same shape. Deleting a category
//! or supplier that products still reference answers 409.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use inventoree_core::{
  KeyValueStore, Saved,
  model::{
    Category, CategoryPatch, NewCategory, NewProduct, NewSupplier, Product, ProductPatch,
    Supplier, SupplierPatch,
  },
};
use serde::Deserialize;

use crate::{
  AppState,
  error::{ApiError, found},
};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Case-insensitive substring filter.
  pub q: Option<String>,
}

fn require_name(name: &str, what: &str) -> Result<(), ApiError> {
  if name.trim().is_empty() {
    return Err(ApiError::BadRequest(format!("{what} name is required")));
  }
  Ok(())
}

// ─── Products ─────────────────────────────────────────────────────────────────

/// `GET /products[?q=<text>]`
pub async fn list_products<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Query(params): Query<SearchParams>,
) -> Json<Vec<Product>> {
  let products = match params.q {
    Some(q) => state.inventory.search_products(&q).await,
    None => state.inventory.products().await,
  };
  Json(products)
}

/// `POST /products`
pub async fn create_product<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Json(body): Json<NewProduct>,
) -> Result<impl IntoResponse, ApiError> {
  require_name(&body.name, "product")?;
  let saved = state.inventory.add_product(body).await;
  Ok((StatusCode::CREATED, Json(saved)))
}

/// `GET /products/{id}`
pub async fn get_product<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
  let product = found(state.inventory.product(&id).await, "product", &id)?;
  Ok(Json(product))
}

/// `PATCH /products/{id}`
pub async fn update_product<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
  Json(patch): Json<ProductPatch>,
) -> Result<Json<Saved<Product>>, ApiError> {
  let saved = state.inventory.update_product(&id, patch).await;
  Ok(Json(found(saved.transpose(), "product", &id)?))
}

/// `DELETE /products/{id}`
pub async fn delete_product<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<Json<Saved<Product>>, ApiError> {
  let saved = state.inventory.delete_product(&id).await;
  Ok(Json(found(saved.transpose(), "product", &id)?))
}

// ─── Categories ───────────────────────────────────────────────────────────────

/// `GET /categories[?q=<text>]`
pub async fn list_categories<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Query(params): Query<SearchParams>,
) -> Json<Vec<Category>> {
  let categories = match params.q {
    Some(q) => state.inventory.search_categories(&q).await,
    None => state.inventory.categories().await,
  };
  Json(categories)
}

/// `POST /categories`
pub async fn create_category<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Json(body): Json<NewCategory>,
) -> Result<impl IntoResponse, ApiError> {
  require_name(&body.name, "category")?;
  let saved = state.inventory.add_category(body).await;
  Ok((StatusCode::CREATED, Json(saved)))
}

/// `GET /categories/{id}`
pub async fn get_category<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
  let category = found(state.inventory.category(&id).await, "category", &id)?;
  Ok(Json(category))
}

/// `PATCH /categories/{id}`
pub async fn update_category<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
  Json(patch): Json<CategoryPatch>,
) -> Result<Json<Saved<Category>>, ApiError> {
  let saved = state.inventory.update_category(&id, patch).await;
  Ok(Json(found(saved.transpose(), "category", &id)?))
}

/// `DELETE /categories/{id}`, 409 while products reference it.
pub async fn delete_category<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<Json<Saved<Category>>, ApiError> {
  let saved = state.inventory.delete_category(&id).await?;
  Ok(Json(found(saved.transpose(), "category", &id)?))
}

// ─── Suppliers ────────────────────────────────────────────────────────────────

/// `GET /suppliers[?q=<text>]`
pub async fn list_suppliers<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Query(params): Query<SearchParams>,
) -> Json<Vec<Supplier>> {
  let suppliers = match params.q {
    Some(q) => state.inventory.search_suppliers(&q).await,
    None => state.inventory.suppliers().await,
  };
  Json(suppliers)
}

/// `POST /suppliers`
pub async fn create_supplier<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Json(body): Json<NewSupplier>,
) -> Result<impl IntoResponse, ApiError> {
  require_name(&body.name, "supplier")?;
  let saved = state.inventory.add_supplier(body).await;
  Ok((StatusCode::CREATED, Json(saved)))
}

/// `GET /suppliers/{id}`
pub async fn get_supplier<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<Json<Supplier>, ApiError> {
  let supplier = found(state.inventory.supplier(&id).await, "supplier", &id)?;
  Ok(Json(supplier))
}

/// `PATCH /suppliers/{id}`
pub async fn update_supplier<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
  Json(patch): Json<SupplierPatch>,
) -> Result<Json<Saved<Supplier>>, ApiError> {
  let saved = state.inventory.update_supplier(&id, patch).await;
  Ok(Json(found(saved.transpose(), "supplier", &id)?))
}

/// `DELETE /suppliers/{id}`, 409 while products reference it.
pub async fn delete_supplier<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<Json<Saved<Supplier>>, ApiError> {
  let saved = state.inventory.delete_supplier(&id).await?;
  Ok(Json(found(saved.transpose(), "supplier", &id)?))
}
