//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The store refused a delete because other records still reference it.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("unprocessable: {0}")]
  Unprocessable(String),
}

impl From<inventoree_core::Error> for ApiError {
  fn from(e: inventoree_core::Error) -> Self {
    use inventoree_core::Error as E;
    match e {
      E::ProductNotFound(_) => ApiError::NotFound(e.to_string()),
      E::CategoryInUse { .. } | E::SupplierInUse { .. } => ApiError::Conflict(e.to_string()),
      E::InvalidSaleQuantity { .. } => ApiError::Unprocessable(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

/// Turn a store-level no-op into a 404.
pub(crate) fn found<T>(record: Option<T>, what: &str, id: &str) -> Result<T, ApiError> {
  record.ok_or_else(|| ApiError::NotFound(format!("{what} {id} not found")))
}
