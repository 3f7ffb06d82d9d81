//! Error types for `inventoree-core`.
//!
//! Backend write failures never surface here: the stores log them and report
//! them through [`Saved::durable`](crate::Saved::durable) instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("product not found: {0}")]
  ProductNotFound(String),

  #[error("category {id} is still referenced by {products} product(s)")]
  CategoryInUse { id: String, products: usize },

  #[error("supplier {id} is still referenced by {products} product(s)")]
  SupplierInUse { id: String, products: usize },

  #[error("invalid sale quantity {requested}; available: {available}")]
  InvalidSaleQuantity { requested: i64, available: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
