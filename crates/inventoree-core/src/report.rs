//! Derived views for the reports, sales and catalogue screens.
//!
//! Everything here is a pure read over the in-memory collections.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  inventory::InventoryStore,
  kv::KeyValueStore,
  model::{Category, Product, Sale, Supplier},
};

/// Colour reported for categories that never had one set.
pub const DEFAULT_CATEGORY_COLOR: &str = "#2563eb";

// ─── Types ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
  OutOfStock,
  LowStock,
  InStock,
}

/// Classify a product's stock level. Zero wins over the low-stock threshold.
pub fn stock_status(product: &Product) -> StockStatus {
  if product.quantity == 0 {
    StockStatus::OutOfStock
  } else if product.is_low_stock() {
    StockStatus::LowStock
  } else {
    StockStatus::InStock
  }
}

/// Per-category roll-up of the products referencing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
  pub category_id:    String,
  pub name:           String,
  pub color:          String,
  pub product_count:  usize,
  pub total_value:    f64,
  pub total_quantity: i64,
  /// Share of all products, 0–100.
  pub percentage:     f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
  pub year:        i32,
  pub month:       u32,
  /// Abbreviated month name, e.g. `"Jan"`.
  pub label:       String,
  pub revenue:     f64,
  pub sales_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
  pub date:        NaiveDate,
  pub sales_count: usize,
  pub revenue:     f64,
}

// ─── Queries ─────────────────────────────────────────────────────────────────

impl<B: KeyValueStore> InventoryStore<B> {
  /// One entry per category, most valuable first.
  pub async fn category_breakdown(&self) -> Vec<CategoryStats> {
    let products = self.products_collection().read().await;
    let categories = self.categories_collection().read().await;
    let total_products = products.len();

    let mut stats: Vec<CategoryStats> = categories
      .iter()
      .map(|category| {
        let members: Vec<&Product> = products
          .iter()
          .filter(|p| p.category_id == category.id)
          .collect();
        let percentage = if total_products > 0 {
          members.len() as f64 / total_products as f64 * 100.0
        } else {
          0.0
        };
        CategoryStats {
          category_id: category.id.clone(),
          name: category.name.clone(),
          color: if category.color.is_empty() {
            DEFAULT_CATEGORY_COLOR.to_owned()
          } else {
            category.color.clone()
          },
          product_count: members.len(),
          total_value: members.iter().map(|p| p.stock_value()).sum(),
          total_quantity: members.iter().fold(0i64, |n, p| n.saturating_add(p.quantity)),
          percentage,
        }
      })
      .collect();

    stats.sort_by(|a, b| b.total_value.total_cmp(&a.total_value));
    stats
  }

  /// Revenue per calendar month (UTC) for the `months` months ending with
  /// the one containing `now`, oldest first.
  pub async fn monthly_sales(&self, months: u32, now: DateTime<Utc>) -> Vec<MonthlySales> {
    let sales = self.sales_collection().read().await;
    let current = now.year() * 12 + now.month0() as i32;

    (0..months as i32)
      .rev()
      .filter_map(|back| {
        let index = current - back;
        let (year, month) = (index.div_euclid(12), index.rem_euclid(12) as u32 + 1);
        let start = month_start(year, month)?;
        let end = if month == 12 {
          month_start(year + 1, 1)?
        } else {
          month_start(year, month + 1)?
        };

        let in_month: Vec<&Sale> = sales
          .iter()
          .filter(|s| s.created_at >= start && s.created_at < end)
          .collect();

        Some(MonthlySales {
          year,
          month,
          label: start.format("%b").to_string(),
          revenue: in_month.iter().map(|s| s.total_amount).sum(),
          sales_count: in_month.len(),
        })
      })
      .collect()
  }

  /// Sales recorded on the UTC calendar day containing `now`.
  pub async fn daily_sales(&self, now: DateTime<Utc>) -> DailySales {
    let today = now.date_naive();
    let sales = self.sales_collection().read().await;
    let (count, revenue) = sales
      .iter()
      .filter(|s| s.created_at.date_naive() == today)
      .fold((0, 0.0), |(n, sum), s| (n + 1, sum + s.total_amount));
    DailySales { date: today, sales_count: count, revenue }
  }

  /// Products with anything on hand.
  pub async fn available_products(&self) -> Vec<Product> {
    self
      .products_collection()
      .read()
      .await
      .iter()
      .filter(|p| p.quantity > 0)
      .cloned()
      .collect()
  }

  /// All sales, newest first.
  pub async fn recent_sales(&self) -> Vec<Sale> {
    let mut sales = self.sales_collection().snapshot().await;
    sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sales
  }

  /// Case-insensitive match over name and SKU.
  pub async fn search_products(&self, query: &str) -> Vec<Product> {
    let needle = query.to_lowercase();
    self
      .products_collection()
      .read()
      .await
      .iter()
      .filter(|p| contains(&p.name, &needle) || contains(&p.sku, &needle))
      .cloned()
      .collect()
  }

  /// Case-insensitive match over name and description.
  pub async fn search_categories(&self, query: &str) -> Vec<Category> {
    let needle = query.to_lowercase();
    self
      .categories_collection()
      .read()
      .await
      .iter()
      .filter(|c| contains(&c.name, &needle) || contains(&c.description, &needle))
      .cloned()
      .collect()
  }

  /// Case-insensitive match over name, contact person and email.
  pub async fn search_suppliers(&self, query: &str) -> Vec<Supplier> {
    let needle = query.to_lowercase();
    self
      .suppliers_collection()
      .read()
      .await
      .iter()
      .filter(|s| {
        contains(&s.name, &needle)
          || contains(&s.contact_person, &needle)
          || contains(&s.email, &needle)
      })
      .cloned()
      .collect()
  }

  pub async fn category_product_count(&self, category_id: &str) -> usize {
    self
      .products_collection()
      .read()
      .await
      .iter()
      .filter(|p| p.category_id == category_id)
      .count()
  }

  pub async fn supplier_product_count(&self, supplier_id: &str) -> usize {
    self
      .products_collection()
      .read()
      .await
      .iter()
      .filter(|p| p.supplier_id == supplier_id)
      .count()
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// `needle` must already be lowercase.
fn contains(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(needle)
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
  NaiveDate::from_ymd_opt(year, month, 1)?
    .and_hms_opt(0, 0, 0)
    .map(|dt| dt.and_utc())
}
