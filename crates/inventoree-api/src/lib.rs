//! JSON REST API for Inventoree.
//!
//! Exposes an axum [`Router`] backed by an [`InventoryStore`] and a
//! [`ChatStore`] over any [`KeyValueStore`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! Mutating endpoints answer with the store's [`Saved`](inventoree_core::Saved)
//! envelope, `{"record": ..., "durable": bool}`, so clients can tell when a
//! change is only held in memory.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", inventoree_api::api_router(state))
//! ```

pub mod catalog;
pub mod chat;
pub mod error;
pub mod reports;
pub mod sales;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use inventoree_core::{ChatStore, InventoryStore, KeyValueStore};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<B> {
  pub inventory: Arc<InventoryStore<B>>,
  pub chat:      Arc<ChatStore<B>>,
}

impl<B> Clone for AppState<B> {
  fn clone(&self) -> Self {
    Self { inventory: self.inventory.clone(), chat: self.chat.clone() }
  }
}

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<B>(state: AppState<B>) -> Router<()>
where
  B: KeyValueStore + 'static,
{
  Router::new()
    // Catalogue
    .route("/products", get(catalog::list_products::<B>).post(catalog::create_product::<B>))
    .route(
      "/products/{id}",
      get(catalog::get_product::<B>)
        .patch(catalog::update_product::<B>)
        .delete(catalog::delete_product::<B>),
    )
    .route(
      "/categories",
      get(catalog::list_categories::<B>).post(catalog::create_category::<B>),
    )
    .route(
      "/categories/{id}",
      get(catalog::get_category::<B>)
        .patch(catalog::update_category::<B>)
        .delete(catalog::delete_category::<B>),
    )
    .route(
      "/suppliers",
      get(catalog::list_suppliers::<B>).post(catalog::create_supplier::<B>),
    )
    .route(
      "/suppliers/{id}",
      get(catalog::get_supplier::<B>)
        .patch(catalog::update_supplier::<B>)
        .delete(catalog::delete_supplier::<B>),
    )
    // Sales
    .route("/sales", get(sales::list::<B>).post(sales::record::<B>))
    .route("/sales/checkout", post(sales::checkout::<B>))
    .route("/stock-movements", get(sales::stock_movements::<B>))
    // Reports
    .route("/reports/low-stock", get(reports::low_stock::<B>))
    .route("/reports/inventory-value", get(reports::inventory_value::<B>))
    .route("/reports/sales", get(reports::sales::<B>))
    .route("/reports/categories", get(reports::categories::<B>))
    .route("/reports/monthly", get(reports::monthly::<B>))
    .route("/reports/today", get(reports::today::<B>))
    // Chat
    .route("/chat/messages", post(chat::send::<B>))
    .route("/chat/users/{user}/conversations", get(chat::conversations::<B>))
    .route("/chat/users/{user}/unread", get(chat::unread::<B>))
    .route("/chat/conversations/{id}/messages", get(chat::messages::<B>))
    .route("/chat/conversations/{id}/read", post(chat::mark_read::<B>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
