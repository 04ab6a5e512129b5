// server/src/models/cart.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One cart row per user. Created lazily on first fetch or first add,
/// never deleted by the cart flow.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
  pub id: i64,
  pub user_id: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A line item belongs to exactly one cart. Uniqueness on
/// (cart_id, product_id) is what makes add-to-cart a merge.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub id: i64,
  pub cart_id: i64,
  pub product_id: i64,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
