// server/src/state.rs

use crate::config::AppConfig;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state, constructed once in `main` and handed to every
/// request handler through `actix_web::web::Data`. The pool is the single
/// long-lived database handle for the process.
#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub config: Arc<AppConfig>,
}
