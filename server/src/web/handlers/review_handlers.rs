// server/src/web/handlers/review_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::review_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequestPayload {
  pub product_id: i64,
  pub rating: i32,
  pub comment: Option<String>,
}

#[instrument(name = "handler::list_reviews", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn list_reviews_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let reviews = review_service::list_reviews(&app_state.db_pool, product_id).await?;

  Ok(HttpResponse::Ok().json(json!({ "reviews": reviews })))
}

/// POST /reviews. Responds with the refreshed review list for the product,
/// which the detail page swaps in wholesale.
#[instrument(
    name = "handler::create_review",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %req_payload.product_id, rating = %req_payload.rating)
)]
pub async fn create_review_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CreateReviewRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let reviews = review_service::create_review(
    &app_state.db_pool,
    auth_user.user_id,
    req_payload.product_id,
    req_payload.rating,
    req_payload.comment.as_deref(),
  )
  .await?;

  info!(count = reviews.len(), "Review created.");

  Ok(HttpResponse::Created().json(json!({
      "message": "Review submitted.",
      "reviews": reviews,
  })))
}
