// server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::cart_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequestPayload {
  pub product_id: i64,
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityRequestPayload {
  pub quantity: i32,
}

/// GET /cart. Creates the cart row transparently on a user's first read.
#[instrument(name = "handler::get_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let view = cart_service::load_cart_view(&app_state.db_pool, auth_user.user_id).await?;

  info!(
    items = view.cart_items.len(),
    total_quantity = view.total_quantity,
    "Cart fetched."
  );

  // CartView serializes to { cartItems, totalQuantity } directly.
  Ok(HttpResponse::Ok().json(view))
}

/// POST /cart. Merges on product identity rather than creating duplicates.
#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  cart_service::add_item(
    &app_state.db_pool,
    auth_user.user_id,
    req_payload.product_id,
    req_payload.quantity,
  )
  .await?;

  info!("Item added to cart.");

  Ok(HttpResponse::Ok().json(json!({ "message": "Item added to cart." })))
}

/// PATCH/PUT /cart/{line_item_id}. Sets the line item's quantity.
#[instrument(
    name = "handler::update_cart_item",
    skip(app_state, path, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, line_item_id = %path.as_ref(), quantity = %req_payload.quantity)
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  req_payload: web::Json<UpdateQuantityRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let line_item_id = path.into_inner();

  let updated =
    cart_service::set_item_quantity(&app_state.db_pool, auth_user.user_id, line_item_id, req_payload.quantity).await?;

  info!(new_quantity = updated.quantity, "Cart item updated.");

  Ok(HttpResponse::Ok().json(json!({
      "message": "Cart item updated.",
      "cartItem": updated,
  })))
}

/// DELETE /cart/{line_item_id}.
#[instrument(
    name = "handler::remove_cart_item",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, line_item_id = %path.as_ref())
)]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let line_item_id = path.into_inner();

  cart_service::remove_item(&app_state.db_pool, auth_user.user_id, line_item_id).await?;

  info!("Cart item removed.");

  Ok(HttpResponse::Ok().json(json!({ "message": "Cart item removed." })))
}
