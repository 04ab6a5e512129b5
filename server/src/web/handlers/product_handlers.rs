// server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::product_service;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let (page, limit) = product_service::sanitize_paging(query_params.page, query_params.limit);

  let (products, pagination) = product_service::list_products(&app_state.db_pool, page, limit).await?;

  info!(count = products.len(), page, "Products listed.");

  Ok(HttpResponse::Ok().json(json!({
      "message": "Products fetched successfully.",
      "products": products,
      "pagination": pagination,
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let (product, gallery) = product_service::get_product(&app_state.db_pool, product_id).await?;

  // Embed the gallery into the product object, as the detail page expects.
  let mut product_json =
    serde_json::to_value(&product).map_err(|e| AppError::Internal(format!("Serialization failed: {}", e)))?;
  product_json["gallery"] =
    serde_json::to_value(&gallery).map_err(|e| AppError::Internal(format!("Serialization failed: {}", e)))?;

  info!("Product fetched.");

  Ok(HttpResponse::Ok().json(json!({
      "message": "Product fetched successfully.",
      "product": product_json,
  })))
}
