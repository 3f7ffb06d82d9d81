//! [`InventoryStore`]: products, categories, suppliers, sales and stock
//! movements held in memory and written through to a [`KeyValueStore`].
//!
//! Every mutation returns a [`Saved`] pairing its result with whether the
//! backend acknowledged the write. A failed write is logged and leaves memory
//! ahead of storage; it is never returned as an error.
//!
//! Sales are recorded independently of stock: neither [`InventoryStore::record_sale`]
//! nor [`InventoryStore::sell_product`] touches a product's `quantity`, and
//! nothing writes to the stock movement collection.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  collection::{Collection, Saved},
  kv::{KeyValueStore, keys},
  model::{
    Category, CategoryPatch, NewCategory, NewProduct, NewSale, NewSupplier, Product,
    ProductPatch, Sale, SaleRequest, StockMovement, Supplier, SupplierPatch,
  },
};

/// Window used by callers that do not pick one for [`InventoryStore::sales_analytics`].
pub const DEFAULT_ANALYTICS_DAYS: u32 = 30;

/// Aggregate figures over the sales of a period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalytics {
  pub total_sales:         usize,
  pub total_revenue:       f64,
  /// Saturates at `i64::MAX`; recorded quantities are not validated.
  pub total_quantity_sold: i64,
  /// `total_revenue / total_sales`, or 0 when there were no sales.
  pub average_order_value: f64,
}

impl SalesAnalytics {
  pub(crate) fn from_sales<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Self {
    let mut out = Self::default();
    for sale in sales {
      out.total_sales += 1;
      out.total_revenue += sale.total_amount;
      out.total_quantity_sold = out.total_quantity_sold.saturating_add(sale.quantity);
    }
    if out.total_sales > 0 {
      out.average_order_value = out.total_revenue / out.total_sales as f64;
    }
    out
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The inventory data layer.
///
/// Construct one per backend and share it behind an `Arc`; there is no
/// process-wide instance.
pub struct InventoryStore<B> {
  backend:         B,
  loading:         AtomicBool,
  products:        Collection<Product>,
  categories:      Collection<Category>,
  suppliers:       Collection<Supplier>,
  sales:           Collection<Sale>,
  stock_movements: Collection<StockMovement>,
}

impl<B: KeyValueStore> InventoryStore<B> {
  /// Create an empty store in the loading state. Call [`load`](Self::load)
  /// to populate it.
  pub fn new(backend: B) -> Self {
    Self {
      backend,
      loading: AtomicBool::new(true),
      products: Collection::new(keys::PRODUCTS),
      categories: Collection::new(keys::CATEGORIES),
      suppliers: Collection::new(keys::SUPPLIERS),
      sales: Collection::new(keys::SALES),
      stock_movements: Collection::new(keys::STOCK_MOVEMENTS),
    }
  }

  /// Create a store and load every collection from `backend`.
  pub async fn open(backend: B) -> Self {
    let store = Self::new(backend);
    store.load().await;
    store
  }

  /// Read all five collections concurrently and leave the loading state.
  ///
  /// Collections whose key is missing, unreadable or malformed start empty.
  pub async fn load(&self) {
    tokio::join!(
      self.products.load(&self.backend),
      self.categories.load(&self.backend),
      self.suppliers.load(&self.backend),
      self.sales.load(&self.backend),
      self.stock_movements.load(&self.backend),
    );
    self.loading.store(false, Ordering::SeqCst);
    tracing::info!("inventory loaded");
  }

  pub fn is_loading(&self) -> bool { self.loading.load(Ordering::SeqCst) }

  pub fn backend(&self) -> &B { &self.backend }

  // ── Snapshots ─────────────────────────────────────────────────────────────

  pub async fn products(&self) -> Vec<Product> { self.products.snapshot().await }

  pub async fn categories(&self) -> Vec<Category> { self.categories.snapshot().await }

  pub async fn suppliers(&self) -> Vec<Supplier> { self.suppliers.snapshot().await }

  pub async fn sales(&self) -> Vec<Sale> { self.sales.snapshot().await }

  /// Always as loaded from storage; no operation appends to it.
  pub async fn stock_movements(&self) -> Vec<StockMovement> {
    self.stock_movements.snapshot().await
  }

  pub async fn product(&self, id: &str) -> Option<Product> {
    self.products.read().await.iter().find(|p| p.id == id).cloned()
  }

  pub async fn category(&self, id: &str) -> Option<Category> {
    self.categories.read().await.iter().find(|c| c.id == id).cloned()
  }

  pub async fn supplier(&self, id: &str) -> Option<Supplier> {
    self.suppliers.read().await.iter().find(|s| s.id == id).cloned()
  }

  // ── Products ──────────────────────────────────────────────────────────────

  pub async fn add_product(&self, input: NewProduct) -> Saved<Product> {
    let product = input.into_product(Utc::now());
    let mut items = self.products.write().await;
    items.push(product.clone());
    let durable = self.products.flush(&self.backend, &items).await;
    Saved::new(product, durable)
  }

  /// Merge `patch` into the product with `id` and refresh `updated_at`.
  ///
  /// Returns `None` without writing when no product has that id.
  pub async fn update_product(&self, id: &str, patch: ProductPatch) -> Saved<Option<Product>> {
    let mut items = self.products.write().await;
    let Some(product) = items.iter_mut().find(|p| p.id == id) else {
      return Saved::new(None, true);
    };
    patch.apply(product);
    product.updated_at = Utc::now();
    let updated = product.clone();
    let durable = self.products.flush(&self.backend, &items).await;
    Saved::new(Some(updated), durable)
  }

  /// Remove the product with `id`, returning it. A missing id is a no-op.
  pub async fn delete_product(&self, id: &str) -> Saved<Option<Product>> {
    let mut items = self.products.write().await;
    let Some(pos) = items.iter().position(|p| p.id == id) else {
      return Saved::new(None, true);
    };
    let removed = items.remove(pos);
    let durable = self.products.flush(&self.backend, &items).await;
    Saved::new(Some(removed), durable)
  }

  // ── Categories ────────────────────────────────────────────────────────────

  pub async fn add_category(&self, input: NewCategory) -> Saved<Category> {
    let category = input.into_category(Utc::now());
    let mut items = self.categories.write().await;
    items.push(category.clone());
    let durable = self.categories.flush(&self.backend, &items).await;
    Saved::new(category, durable)
  }

  pub async fn update_category(&self, id: &str, patch: CategoryPatch) -> Saved<Option<Category>> {
    let mut items = self.categories.write().await;
    let Some(category) = items.iter_mut().find(|c| c.id == id) else {
      return Saved::new(None, true);
    };
    patch.apply(category);
    let updated = category.clone();
    let durable = self.categories.flush(&self.backend, &items).await;
    Saved::new(Some(updated), durable)
  }

  /// Remove the category with `id`.
  ///
  /// Fails with [`Error::CategoryInUse`] while any product references it. The
  /// products lock is held until the removal is written, so no product can
  /// start referencing the category in between.
  pub async fn delete_category(&self, id: &str) -> Result<Saved<Option<Category>>> {
    let products = self.products.read().await;
    let in_use = products.iter().filter(|p| p.category_id == id).count();
    if in_use > 0 {
      return Err(Error::CategoryInUse { id: id.to_owned(), products: in_use });
    }

    let mut items = self.categories.write().await;
    let Some(pos) = items.iter().position(|c| c.id == id) else {
      return Ok(Saved::new(None, true));
    };
    let removed = items.remove(pos);
    let durable = self.categories.flush(&self.backend, &items).await;
    Ok(Saved::new(Some(removed), durable))
  }

  // ── Suppliers ─────────────────────────────────────────────────────────────

  pub async fn add_supplier(&self, input: NewSupplier) -> Saved<Supplier> {
    let supplier = input.into_supplier(Utc::now());
    let mut items = self.suppliers.write().await;
    items.push(supplier.clone());
    let durable = self.suppliers.flush(&self.backend, &items).await;
    Saved::new(supplier, durable)
  }

  pub async fn update_supplier(&self, id: &str, patch: SupplierPatch) -> Saved<Option<Supplier>> {
    let mut items = self.suppliers.write().await;
    let Some(supplier) = items.iter_mut().find(|s| s.id == id) else {
      return Saved::new(None, true);
    };
    patch.apply(supplier);
    let updated = supplier.clone();
    let durable = self.suppliers.flush(&self.backend, &items).await;
    Saved::new(Some(updated), durable)
  }

  /// Remove the supplier with `id`. Fails with [`Error::SupplierInUse`] while
  /// any product references it.
  pub async fn delete_supplier(&self, id: &str) -> Result<Saved<Option<Supplier>>> {
    let products = self.products.read().await;
    let in_use = products.iter().filter(|p| p.supplier_id == id).count();
    if in_use > 0 {
      return Err(Error::SupplierInUse { id: id.to_owned(), products: in_use });
    }

    let mut items = self.suppliers.write().await;
    let Some(pos) = items.iter().position(|s| s.id == id) else {
      return Ok(Saved::new(None, true));
    };
    let removed = items.remove(pos);
    let durable = self.suppliers.flush(&self.backend, &items).await;
    Ok(Saved::new(Some(removed), durable))
  }

  // ── Sales (append-only) ──────────────────────────────────────────────────

  /// Append a sale exactly as given. Stock levels are not adjusted.
  pub async fn record_sale(&self, input: NewSale) -> Saved<Sale> {
    let sale = input.into_sale(Utc::now());
    let mut items = self.sales.write().await;
    items.push(sale.clone());
    let durable = self.sales.flush(&self.backend, &items).await;
    Saved::new(sale, durable)
  }

  /// Price a sale from the product's current price and record it.
  ///
  /// Rejects unknown products and quantities outside `1..=product.quantity`.
  /// Like [`record_sale`](Self::record_sale), this leaves `quantity` as is.
  pub async fn sell_product(&self, request: SaleRequest) -> Result<Saved<Sale>> {
    let product = self
      .product(&request.product_id)
      .await
      .ok_or_else(|| Error::ProductNotFound(request.product_id.clone()))?;

    if request.quantity <= 0 || request.quantity > product.quantity {
      return Err(Error::InvalidSaleQuantity {
        requested: request.quantity,
        available: product.quantity,
      });
    }

    let sale = NewSale {
      product_id:    product.id,
      quantity:      request.quantity,
      unit_price:    product.price,
      total_amount:  product.price * request.quantity as f64,
      customer_id:   None,
      customer_name: request.customer_name.filter(|n| !n.is_empty()),
      user_id:       request.user_id,
    };
    Ok(self.record_sale(sale).await)
  }

  // ── Analytics ─────────────────────────────────────────────────────────────

  /// Products whose quantity is at or below their minimum.
  pub async fn low_stock_products(&self) -> Vec<Product> {
    self
      .products
      .read()
      .await
      .iter()
      .filter(|p| p.is_low_stock())
      .cloned()
      .collect()
  }

  /// Sum of `quantity * cost` over all products.
  pub async fn total_inventory_value(&self) -> f64 {
    self.products.read().await.iter().map(Product::stock_value).sum()
  }

  /// Figures over the sales recorded in the last `days` days.
  pub async fn sales_analytics(&self, days: u32) -> SalesAnalytics {
    self.sales_analytics_at(days, Utc::now()).await
  }

  /// As [`sales_analytics`](Self::sales_analytics), for sales with
  /// `created_at` in `[now - days, now]`. A window reaching past the earliest
  /// representable instant covers every sale up to `now`.
  pub async fn sales_analytics_at(&self, days: u32, now: DateTime<Utc>) -> SalesAnalytics {
    let start = now
      .checked_sub_signed(Duration::days(i64::from(days)))
      .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let sales = self.sales.read().await;
    SalesAnalytics::from_sales(
      sales
        .iter()
        .filter(|s| s.created_at >= start && s.created_at <= now),
    )
  }

  // ── Crate-internal access for reports ─────────────────────────────────────

  pub(crate) fn products_collection(&self) -> &Collection<Product> { &self.products }

  pub(crate) fn categories_collection(&self) -> &Collection<Category> { &self.categories }

  pub(crate) fn suppliers_collection(&self) -> &Collection<Supplier> { &self.suppliers }

  pub(crate) fn sales_collection(&self) -> &Collection<Sale> { &self.sales }
}
