// server/src/services/product_service.rs

use crate::errors::{AppError, Result};
use crate::models::{GalleryImage, Product};
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

pub const DEFAULT_PAGE_LIMIT: i64 = 12;
pub const MAX_PAGE_LIMIT: i64 = 100;
// Ceiling on the page number keeps (page - 1) * limit well inside i64 for
// any allowed limit; pages past the catalog end simply come back empty.
pub const MAX_PAGE: i64 = 1_000_000;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub current_page: i64,
  pub total_pages: i64,
  pub total_count: i64,
  pub limit: i64,
}

/// Total pages for a count at a given page size; an empty catalog still has
/// one (empty) page so the UI always has a valid current page.
pub fn total_pages(total_count: i64, limit: i64) -> i64 {
  ((total_count + limit - 1) / limit).max(1)
}

/// Clamps caller-supplied paging parameters into sane bounds.
pub fn sanitize_paging(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
  let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
  let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
  (page, limit)
}

#[instrument(name = "product_service::list_products", skip(pool))]
pub async fn list_products(pool: &PgPool, page: i64, limit: i64) -> Result<(Vec<Product>, Pagination)> {
  let total_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
    .fetch_one(pool)
    .await?;

  let products = sqlx::query_as::<_, Product>(
    "SELECT id, title, description, category, price_cents, discount_percent, thumbnail, colors, sizes, \
            created_at, updated_at \
     FROM products ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
  )
  .bind(limit)
  .bind(page.saturating_sub(1).saturating_mul(limit))
  .fetch_all(pool)
  .await?;

  let pagination = Pagination {
    current_page: page,
    total_pages: total_pages(total_count, limit),
    total_count,
    limit,
  };

  Ok((products, pagination))
}

#[instrument(name = "product_service::get_product", skip(pool))]
pub async fn get_product(pool: &PgPool, product_id: i64) -> Result<(Product, Vec<GalleryImage>)> {
  let product = sqlx::query_as::<_, Product>(
    "SELECT id, title, description, category, price_cents, discount_percent, thumbnail, colors, sizes, \
            created_at, updated_at \
     FROM products WHERE id = $1",
  )
  .bind(product_id)
  .fetch_optional(pool)
  .await?
  .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", product_id)))?;

  let gallery = sqlx::query_as::<_, GalleryImage>(
    "SELECT id, product_id, thumbnail FROM product_gallery WHERE product_id = $1 ORDER BY id ASC",
  )
  .bind(product_id)
  .fetch_all(pool)
  .await?;

  Ok((product, gallery))
}
