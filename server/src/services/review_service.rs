// server/src/services/review_service.rs

use crate::errors::{AppError, Result};
use crate::models::Review;
use sqlx::PgPool;
use tracing::instrument;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Ratings are a 1..=5 star scale.
pub fn validate_rating(rating: i32) -> Result<()> {
  if !(MIN_RATING..=MAX_RATING).contains(&rating) {
    return Err(AppError::Validation(format!(
      "Rating must be between {} and {}.",
      MIN_RATING, MAX_RATING
    )));
  }
  Ok(())
}

#[instrument(name = "review_service::list_reviews", skip(pool))]
pub async fn list_reviews(pool: &PgPool, product_id: i64) -> Result<Vec<Review>> {
  let reviews = sqlx::query_as::<_, Review>(
    "SELECT id, product_id, user_id, rating, comment, created_at \
     FROM reviews WHERE product_id = $1 ORDER BY created_at DESC, id DESC",
  )
  .bind(product_id)
  .fetch_all(pool)
  .await?;
  Ok(reviews)
}

/// Inserts the review and returns the refreshed review list for the
/// product, which is what the detail page renders after submission.
#[instrument(name = "review_service::create_review", skip(pool, comment))]
pub async fn create_review(
  pool: &PgPool,
  user_id: i64,
  product_id: i64,
  rating: i32,
  comment: Option<&str>,
) -> Result<Vec<Review>> {
  validate_rating(rating)?;

  let product_exists = sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
  if product_exists.is_none() {
    return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
  }

  sqlx::query("INSERT INTO reviews (product_id, user_id, rating, comment) VALUES ($1, $2, $3, $4)")
    .bind(product_id)
    .bind(user_id)
    .bind(rating)
    .bind(comment)
    .execute(pool)
    .await?;

  list_reviews(pool, product_id).await
}
