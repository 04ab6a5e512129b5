// server/src/web/handlers/auth_handlers.rs

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::extractors::{AuthenticatedUser, SESSION_COOKIE};

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequestPayload {
  pub email: String,
  pub password: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

fn session_cookie(token: Uuid, ttl_days: i64) -> Cookie<'static> {
  Cookie::build(SESSION_COOKIE, token.to_string())
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .max_age(CookieDuration::days(ttl_days))
    .finish()
}

#[instrument(
    name = "handler::signup",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  info!("Signup attempt.");

  let user = auth_service::signup(
    &app_state.db_pool,
    &req_payload.email,
    &req_payload.password,
    req_payload.first_name.as_deref(),
    req_payload.last_name.as_deref(),
  )
  .await?;

  info!(user_id = user.id, "Signup successful.");

  Ok(HttpResponse::Created().json(json!({
      "message": "User created successfully.",
      "userId": user.id,
      "email": user.email,
  })))
}

#[instrument(
    name = "handler::signin",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  info!("Signin attempt.");

  let user = auth_service::signin(&app_state.db_pool, &req_payload.email, &req_payload.password).await?;
  let session = auth_service::create_session(&app_state.db_pool, user.id, app_state.config.session_ttl_days).await?;

  info!(user_id = user.id, "Signin successful.");

  Ok(
    HttpResponse::Ok()
      .cookie(session_cookie(session.token, app_state.config.session_ttl_days))
      .json(json!({
          "message": "Signin successful.",
          "userId": user.id,
          "email": user.email,
      })),
  )
}

/// Signout is idempotent: an absent or unknown cookie still yields a 200 and
/// a cleared cookie.
#[instrument(name = "handler::signout", skip(app_state, req))]
pub async fn signout_handler(app_state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
  if let Some(cookie) = req.cookie(SESSION_COOKIE) {
    if let Ok(token) = Uuid::parse_str(cookie.value()) {
      auth_service::delete_session(&app_state.db_pool, token).await?;
    } else {
      warn!("Signout with a malformed session cookie; clearing it anyway.");
    }
  }

  let mut removal = Cookie::new(SESSION_COOKIE, "");
  removal.set_path("/");

  let mut response = HttpResponse::Ok().json(json!({ "message": "Signed out." }));
  response
    .add_removal_cookie(&removal)
    .map_err(|e| AppError::Internal(format!("Failed to clear session cookie: {}", e)))?;
  Ok(response)
}

#[instrument(name = "handler::me", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let email: Option<String> = sqlx::query_scalar("SELECT email FROM users WHERE id = $1")
    .bind(auth_user.user_id)
    .fetch_optional(&app_state.db_pool)
    .await?;

  let email = email.ok_or_else(|| AppError::Auth("Session refers to a deleted user.".to_string()))?;

  Ok(HttpResponse::Ok().json(json!({
      "userId": auth_user.user_id,
      "email": email,
  })))
}
