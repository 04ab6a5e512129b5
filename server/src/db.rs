// server/src/db.rs

//! Startup-time database helpers. Schema lives in `schema.sql`; seeding is
//! opt-in through the SEED_DB flag and only touches an empty catalog.

use crate::errors::Result;
use sqlx::PgPool;
use tracing::{info, instrument};

#[instrument(name = "db::seed_demo_products", skip(pool))]
pub async fn seed_demo_products(pool: &PgPool) -> Result<()> {
  let product_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
    .fetch_one(pool)
    .await?;

  if product_count > 0 {
    info!(product_count, "Catalog already populated; skipping seed.");
    return Ok(());
  }

  let demo: [(&str, &str, &str, i32, Option<i32>, &str); 3] = [
    (
      "Classic Tee",
      "A plain cotton tee.",
      "apparel",
      1999,
      None,
      "/images/classic-tee.jpg",
    ),
    (
      "Canvas Tote",
      "Heavy-duty canvas tote bag.",
      "accessories",
      2499,
      Some(10),
      "/images/canvas-tote.jpg",
    ),
    (
      "Trail Sneaker",
      "Lightweight trail sneaker.",
      "footwear",
      7999,
      Some(15),
      "/images/trail-sneaker.jpg",
    ),
  ];

  for (title, description, category, price_cents, discount_percent, thumbnail) in demo {
    let product_id = sqlx::query_scalar::<_, i64>(
      "INSERT INTO products (title, description, category, price_cents, discount_percent, thumbnail, colors, sizes) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(title)
    .bind(description)
    .bind(category)
    .bind(price_cents)
    .bind(discount_percent)
    .bind(thumbnail)
    .bind(vec!["black".to_string(), "white".to_string()])
    .bind(vec!["S".to_string(), "M".to_string(), "L".to_string()])
    .fetch_one(pool)
    .await?;

    sqlx::query("INSERT INTO product_gallery (product_id, thumbnail) VALUES ($1, $2)")
      .bind(product_id)
      .bind(thumbnail)
      .execute(pool)
      .await?;
  }

  info!("Seeded demo products.");
  Ok(())
}
