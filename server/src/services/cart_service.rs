// server/src/services/cart_service.rs

//! Authoritative cart semantics: lazy cart creation, merge-on-add,
//! ownership checks, and assembly of the cart view returned by GET /cart.

use crate::errors::{AppError, Result};
use crate::models::{Cart, CartItem, GalleryImage};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// One joined row of a cart read: the line item plus the product display
/// snapshot fetched fresh from the products table.
#[derive(Debug, Clone, FromRow)]
pub struct CartLineRow {
  pub id: i64,
  pub product_id: i64,
  pub quantity: i32,
  pub title: String,
  pub price_cents: i32,
  pub discount_percent: Option<i32>,
  pub thumbnail: Option<String>,
  pub colors: Vec<String>,
  pub sizes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryThumb {
  pub thumbnail: String,
}

/// Denormalized product display fields embedded in each line item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
  pub id: i64,
  pub title: String,
  pub price_cents: i32,
  pub discount_percent: Option<i32>,
  pub thumbnail: Option<String>,
  pub colors: Vec<String>,
  pub sizes: Vec<String>,
  pub gallery: Vec<GalleryThumb>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
  pub id: i64,
  pub product_id: i64,
  pub quantity: i32,
  pub product: ProductSnapshot,
}

/// The wire shape of GET /cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  pub cart_items: Vec<CartItemView>,
  pub total_quantity: i32,
}

/// Builds the response view from joined line rows plus the gallery rows of
/// every referenced product. `total_quantity` is always recomputed here.
pub fn assemble_cart_view(rows: Vec<CartLineRow>, gallery: Vec<GalleryImage>) -> CartView {
  let mut gallery_by_product: HashMap<i64, Vec<GalleryThumb>> = HashMap::new();
  for image in gallery {
    gallery_by_product
      .entry(image.product_id)
      .or_default()
      .push(GalleryThumb { thumbnail: image.thumbnail });
  }

  let cart_items: Vec<CartItemView> = rows
    .into_iter()
    .map(|row| CartItemView {
      id: row.id,
      product_id: row.product_id,
      quantity: row.quantity,
      product: ProductSnapshot {
        id: row.product_id,
        title: row.title,
        price_cents: row.price_cents,
        discount_percent: row.discount_percent,
        thumbnail: row.thumbnail,
        colors: row.colors,
        sizes: row.sizes,
        gallery: gallery_by_product.remove(&row.product_id).unwrap_or_default(),
      },
    })
    .collect();

  let total_quantity = cart_items.iter().map(|item| item.quantity).sum();

  CartView {
    cart_items,
    total_quantity,
  }
}

/// Returns the user's cart, creating the row transparently if none exists.
#[instrument(name = "cart_service::get_or_create_cart", skip(pool))]
pub async fn get_or_create_cart(pool: &PgPool, user_id: i64) -> Result<Cart> {
  let existing = sqlx::query_as::<_, Cart>("SELECT id, user_id, created_at, updated_at FROM carts WHERE user_id = $1")
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

  if let Some(cart) = existing {
    return Ok(cart);
  }

  debug!("No cart for user; creating one.");
  // ON CONFLICT covers two first-fetches racing on the unique user_id.
  let cart = sqlx::query_as::<_, Cart>(
    "INSERT INTO carts (user_id) VALUES ($1) \
     ON CONFLICT (user_id) DO UPDATE SET updated_at = now() \
     RETURNING id, user_id, created_at, updated_at",
  )
  .bind(user_id)
  .fetch_one(pool)
  .await?;

  Ok(cart)
}

/// Full cart read for GET /cart: line items in insertion order, each with a
/// freshly joined product snapshot and gallery.
#[instrument(name = "cart_service::load_cart_view", skip(pool))]
pub async fn load_cart_view(pool: &PgPool, user_id: i64) -> Result<CartView> {
  let cart = get_or_create_cart(pool, user_id).await?;

  let rows = sqlx::query_as::<_, CartLineRow>(
    "SELECT ci.id, ci.product_id, ci.quantity, \
            p.title, p.price_cents, p.discount_percent, p.thumbnail, p.colors, p.sizes \
     FROM cart_items ci \
     JOIN products p ON p.id = ci.product_id \
     WHERE ci.cart_id = $1 \
     ORDER BY ci.added_at ASC, ci.id ASC",
  )
  .bind(cart.id)
  .fetch_all(pool)
  .await?;

  let product_ids: Vec<i64> = rows.iter().map(|r| r.product_id).collect();
  let gallery = if product_ids.is_empty() {
    Vec::new()
  } else {
    sqlx::query_as::<_, GalleryImage>(
      "SELECT id, product_id, thumbnail FROM product_gallery WHERE product_id = ANY($1) ORDER BY id ASC",
    )
    .bind(&product_ids)
    .fetch_all(pool)
    .await?
  };

  Ok(assemble_cart_view(rows, gallery))
}

/// POST /cart: merge on product identity. An existing line item for the
/// product gains `quantity`; otherwise a new row is inserted.
#[instrument(name = "cart_service::add_item", skip(pool))]
pub async fn add_item(pool: &PgPool, user_id: i64, product_id: i64, quantity: i32) -> Result<()> {
  if quantity < 1 {
    return Err(AppError::Validation("Quantity must be a positive integer.".to_string()));
  }

  let product_exists = sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
  if product_exists.is_none() {
    return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
  }

  let cart = get_or_create_cart(pool, user_id).await?;

  sqlx::query(
    "INSERT INTO cart_items (cart_id, product_id, quantity) VALUES ($1, $2, $3) \
     ON CONFLICT (cart_id, product_id) \
     DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = now()",
  )
  .bind(cart.id)
  .bind(product_id)
  .bind(quantity)
  .execute(pool)
  .await?;

  Ok(())
}

#[derive(Debug, FromRow)]
struct OwnedLineRow {
  id: i64,
  cart_id: i64,
  product_id: i64,
  quantity: i32,
  added_at: chrono::DateTime<chrono::Utc>,
  updated_at: chrono::DateTime<chrono::Utc>,
  owner_user_id: i64,
}

/// The access decision for a line-item operation. Absence is a not-found;
/// a foreign owner is a forbidden. The order matters: an id that exists
/// under another user must not read as "not found" downstream, and a truly
/// absent id must not read as "forbidden".
fn resolve_owned_item(row: Option<OwnedLineRow>, line_item_id: i64, user_id: i64) -> Result<CartItem> {
  let Some(row) = row else {
    return Err(AppError::NotFound(format!("Cart item with ID {} not found.", line_item_id)));
  };
  if row.owner_user_id != user_id {
    return Err(AppError::Forbidden("You do not have access to this cart item.".to_string()));
  }

  Ok(CartItem {
    id: row.id,
    cart_id: row.cart_id,
    product_id: row.product_id,
    quantity: row.quantity,
    added_at: row.added_at,
    updated_at: row.updated_at,
  })
}

/// Looks a line item up together with its cart's owner and applies
/// [`resolve_owned_item`].
async fn fetch_owned_item(pool: &PgPool, line_item_id: i64, user_id: i64) -> Result<CartItem> {
  let row = sqlx::query_as::<_, OwnedLineRow>(
    "SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, ci.added_at, ci.updated_at, \
            c.user_id AS owner_user_id \
     FROM cart_items ci \
     JOIN carts c ON c.id = ci.cart_id \
     WHERE ci.id = $1",
  )
  .bind(line_item_id)
  .fetch_optional(pool)
  .await?;

  resolve_owned_item(row, line_item_id, user_id)
}

/// PATCH/PUT /cart/{id}: set the line item's quantity.
#[instrument(name = "cart_service::set_item_quantity", skip(pool))]
pub async fn set_item_quantity(pool: &PgPool, user_id: i64, line_item_id: i64, quantity: i32) -> Result<CartItem> {
  if quantity < 1 {
    return Err(AppError::Validation("Quantity must be a positive integer.".to_string()));
  }

  fetch_owned_item(pool, line_item_id, user_id).await?;

  let updated = sqlx::query_as::<_, CartItem>(
    "UPDATE cart_items SET quantity = $2, updated_at = now() WHERE id = $1 \
     RETURNING id, cart_id, product_id, quantity, added_at, updated_at",
  )
  .bind(line_item_id)
  .bind(quantity)
  .fetch_one(pool)
  .await?;

  Ok(updated)
}

/// DELETE /cart/{id}.
#[instrument(name = "cart_service::remove_item", skip(pool))]
pub async fn remove_item(pool: &PgPool, user_id: i64, line_item_id: i64) -> Result<()> {
  fetch_owned_item(pool, line_item_id, user_id).await?;

  sqlx::query("DELETE FROM cart_items WHERE id = $1")
    .bind(line_item_id)
    .execute(pool)
    .await?;

  Ok(())
}
