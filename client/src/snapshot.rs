// src/snapshot.rs

//! Wire and in-memory shapes of the cart. Field names follow the service's
//! camelCase JSON contract.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryThumb {
  pub thumbnail: String,
}

/// Denormalized product display snapshot embedded in each line item,
/// fetched fresh by the service on every cart read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
  pub id: i64,
  pub title: String,
  pub price_cents: i32,
  #[serde(default)]
  pub discount_percent: Option<i32>,
  #[serde(default)]
  pub thumbnail: Option<String>,
  #[serde(default)]
  pub colors: Vec<String>,
  #[serde(default)]
  pub sizes: Vec<String>,
  #[serde(default)]
  pub gallery: Vec<GalleryThumb>,
}

/// A (product, quantity) pairing within the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
  pub id: i64,
  pub product_id: i64,
  pub quantity: i32,
  #[serde(default)]
  pub product: Option<ProductSummary>,
}

/// The last-known cart state held by the store. Empty by default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartSnapshot {
  pub line_items: Vec<LineItem>,
  pub total_quantity: i32,
}

impl CartSnapshot {
  pub fn is_empty(&self) -> bool {
    self.line_items.is_empty()
  }
}

/// Wire shape of GET /cart. `totalQuantity` is optional on the wire; the
/// client recomputes it from the line items when the service omits it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
  #[serde(default)]
  pub cart_items: Vec<LineItem>,
  #[serde(default)]
  pub total_quantity: Option<i32>,
}

impl CartPayload {
  /// Wholesale conversion into the store's snapshot form.
  pub fn into_snapshot(self) -> CartSnapshot {
    let total_quantity = self
      .total_quantity
      .unwrap_or_else(|| self.cart_items.iter().map(|item| item.quantity).sum());
    CartSnapshot {
      line_items: self.cart_items,
      total_quantity,
    }
  }
}
