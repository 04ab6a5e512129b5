// server/src/web/extractors.rs

//! Request extractors. `AuthenticatedUser` resolves the session cookie to a
//! user id; protected handlers take it as an argument and get a 401 for free
//! when the session is missing or expired.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;

/// Name of the HttpOnly cookie carrying the session token.
pub const SESSION_COOKIE: &str = "storefront_session";

#[derive(Debug)]
pub struct AuthenticatedUser {
  pub user_id: i64,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let req = req.clone();
    Box::pin(async move {
      let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("AppState is not configured on the App.".to_string()))?;

      let Some(cookie) = req.cookie(SESSION_COOKIE) else {
        warn!("AuthenticatedUser extractor: no session cookie on request.");
        return Err(AppError::Auth("You are not signed in.".to_string()));
      };

      let token = Uuid::parse_str(cookie.value()).map_err(|_| {
        warn!("AuthenticatedUser extractor: session cookie is not a valid token.");
        AppError::Auth("Invalid session token.".to_string())
      })?;

      match auth_service::resolve_session(&state.db_pool, token).await? {
        Some(user_id) => Ok(AuthenticatedUser { user_id }),
        None => {
          warn!("AuthenticatedUser extractor: unknown or expired session token.");
          Err(AppError::Auth("Session expired or invalid.".to_string()))
        }
      }
    })
  }
}
