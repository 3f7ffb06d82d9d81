//! Entity records, creation inputs, and partial-update patches.
//!
//! Every record serialises with camelCase field names; the persisted JSON
//! arrays keep the same shape the mobile app wrote, so data written by either
//! side loads in the other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Generate a fresh entity id.
///
/// Ids are time-ordered (UUID v7) so they sort by creation within a process,
/// but callers must treat them as opaque strings.
pub fn new_id() -> String { Uuid::now_v7().to_string() }

// ─── Product ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id:           String,
  pub name:         String,
  pub sku:          String,
  pub description:  String,
  /// Soft reference into the categories collection.
  pub category_id:  String,
  /// Soft reference into the suppliers collection.
  pub supplier_id:  String,
  pub quantity:     i64,
  pub min_quantity: i64,
  pub price:        f64,
  pub cost:         f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image:        Option<String>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Product {
  pub fn is_low_stock(&self) -> bool { self.quantity <= self.min_quantity }

  /// On-hand value at cost.
  pub fn stock_value(&self) -> f64 { self.quantity as f64 * self.cost }
}

/// Input for [`InventoryStore::add_product`](crate::InventoryStore::add_product).
/// The store assigns `id`, `created_at` and `updated_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
  pub name:         String,
  pub sku:          String,
  #[serde(default)]
  pub description:  String,
  pub category_id:  String,
  pub supplier_id:  String,
  pub quantity:     i64,
  pub min_quantity: i64,
  pub price:        f64,
  pub cost:         f64,
  #[serde(default)]
  pub image:        Option<String>,
}

impl NewProduct {
  pub(crate) fn into_product(self, now: DateTime<Utc>) -> Product {
    Product {
      id:           new_id(),
      name:         self.name,
      sku:          self.sku,
      description:  self.description,
      category_id:  self.category_id,
      supplier_id:  self.supplier_id,
      quantity:     self.quantity,
      min_quantity: self.min_quantity,
      price:        self.price,
      cost:         self.cost,
      image:        self.image,
      created_at:   now,
      updated_at:   now,
    }
  }
}

/// A partial update for a [`Product`]. Absent fields are left untouched.
///
/// `id`, `created_at` and `updated_at` are not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
  pub name:         Option<String>,
  pub sku:          Option<String>,
  pub description:  Option<String>,
  pub category_id:  Option<String>,
  pub supplier_id:  Option<String>,
  pub quantity:     Option<i64>,
  pub min_quantity: Option<i64>,
  pub price:        Option<f64>,
  pub cost:         Option<f64>,
  /// `Some(None)` clears the image; `None` leaves it as is.
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub image:        Option<Option<String>>,
}

impl ProductPatch {
  pub(crate) fn apply(self, product: &mut Product) {
    if let Some(v) = self.name {
      product.name = v;
    }
    if let Some(v) = self.sku {
      product.sku = v;
    }
    if let Some(v) = self.description {
      product.description = v;
    }
    if let Some(v) = self.category_id {
      product.category_id = v;
    }
    if let Some(v) = self.supplier_id {
      product.supplier_id = v;
    }
    if let Some(v) = self.quantity {
      product.quantity = v;
    }
    if let Some(v) = self.min_quantity {
      product.min_quantity = v;
    }
    if let Some(v) = self.price {
      product.price = v;
    }
    if let Some(v) = self.cost {
      product.cost = v;
    }
    if let Some(v) = self.image {
      product.image = v;
    }
  }
}

// ─── Category ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
  pub id:          String,
  pub name:        String,
  pub description: String,
  /// Display colour, e.g. `#2563eb`. May be empty.
  pub color:       String,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
  pub name:        String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub color:       String,
}

impl NewCategory {
  pub(crate) fn into_category(self, now: DateTime<Utc>) -> Category {
    Category {
      id:          new_id(),
      name:        self.name,
      description: self.description,
      color:       self.color,
      created_at:  now,
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub color:       Option<String>,
}

impl CategoryPatch {
  pub(crate) fn apply(self, category: &mut Category) {
    if let Some(v) = self.name {
      category.name = v;
    }
    if let Some(v) = self.description {
      category.description = v;
    }
    if let Some(v) = self.color {
      category.color = v;
    }
  }
}

// ─── Supplier ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
  pub id:             String,
  pub name:           String,
  pub email:          String,
  pub phone:          String,
  pub address:        String,
  pub contact_person: String,
  pub created_at:     DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
  pub name:           String,
  #[serde(default)]
  pub email:          String,
  #[serde(default)]
  pub phone:          String,
  #[serde(default)]
  pub address:        String,
  #[serde(default)]
  pub contact_person: String,
}

impl NewSupplier {
  pub(crate) fn into_supplier(self, now: DateTime<Utc>) -> Supplier {
    Supplier {
      id:             new_id(),
      name:           self.name,
      email:          self.email,
      phone:          self.phone,
      address:        self.address,
      contact_person: self.contact_person,
      created_at:     now,
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPatch {
  pub name:           Option<String>,
  pub email:          Option<String>,
  pub phone:          Option<String>,
  pub address:        Option<String>,
  pub contact_person: Option<String>,
}

impl SupplierPatch {
  pub(crate) fn apply(self, supplier: &mut Supplier) {
    if let Some(v) = self.name {
      supplier.name = v;
    }
    if let Some(v) = self.email {
      supplier.email = v;
    }
    if let Some(v) = self.phone {
      supplier.phone = v;
    }
    if let Some(v) = self.address {
      supplier.address = v;
    }
    if let Some(v) = self.contact_person {
      supplier.contact_person = v;
    }
  }
}

// ─── Sale ────────────────────────────────────────────────────────────────────

/// A recorded sale. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
  pub id:            String,
  pub product_id:    String,
  pub quantity:      i64,
  pub unit_price:    f64,
  pub total_amount:  f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub customer_id:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub customer_name: Option<String>,
  pub user_id:       String,
  pub created_at:    DateTime<Utc>,
}

/// Input for [`InventoryStore::record_sale`](crate::InventoryStore::record_sale).
/// Amounts are taken as given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
  pub product_id:    String,
  pub quantity:      i64,
  pub unit_price:    f64,
  pub total_amount:  f64,
  #[serde(default)]
  pub customer_id:   Option<String>,
  #[serde(default)]
  pub customer_name: Option<String>,
  pub user_id:       String,
}

impl NewSale {
  pub(crate) fn into_sale(self, now: DateTime<Utc>) -> Sale {
    Sale {
      id:            new_id(),
      product_id:    self.product_id,
      quantity:      self.quantity,
      unit_price:    self.unit_price,
      total_amount:  self.total_amount,
      customer_id:   self.customer_id,
      customer_name: self.customer_name,
      user_id:       self.user_id,
      created_at:    now,
    }
  }
}

/// Input for [`InventoryStore::sell_product`](crate::InventoryStore::sell_product):
/// the store prices the sale from the product record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
  pub product_id:    String,
  pub quantity:      i64,
  #[serde(default)]
  pub customer_name: Option<String>,
  pub user_id:       String,
}

// ─── Stock movement ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
  Sale,
  Purchase,
  Adjustment,
}

/// A change in a product's on-hand quantity.
///
/// The collection is loaded and exposed, but no store operation writes to it:
/// neither sales nor product updates emit movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
  pub id:                String,
  pub product_id:        String,
  #[serde(rename = "type")]
  pub kind:              MovementKind,
  pub quantity:          i64,
  pub previous_quantity: i64,
  pub new_quantity:      i64,
  pub reason:            String,
  pub user_id:           String,
  pub created_at:        DateTime<Utc>,
}

// ─── Chat ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
  pub id:          String,
  pub sender_id:   String,
  pub receiver_id: String,
  pub message:     String,
  pub timestamp:   DateTime<Utc>,
  pub read:        bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatConversation {
  pub id:           String,
  pub participants: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_message: Option<ChatMessage>,
  pub updated_at:   DateTime<Utc>,
}

// ─── Serde helpers ───────────────────────────────────────────────────────────

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`).
fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}
