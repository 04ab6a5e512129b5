// server/src/models/review.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
  pub id: i64,
  pub product_id: i64,
  pub user_id: i64,
  /// 1 through 5 inclusive, validated at the handler boundary.
  pub rating: i32,
  pub comment: Option<String>,
  pub created_at: DateTime<Utc>,
}
