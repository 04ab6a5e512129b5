// server/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: i64,
  pub title: String,
  pub description: Option<String>,
  pub category: Option<String>,
  pub price_cents: i32,
  pub discount_percent: Option<i32>,
  pub thumbnail: Option<String>,
  pub colors: Vec<String>,
  pub sizes: Vec<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// One gallery thumbnail for a product. Cart reads embed these in the
/// product display snapshot.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
  pub id: i64,
  pub product_id: i64,
  pub thumbnail: String,
}
