// server/src/models/session.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A server-side session row. The token is the opaque value carried by the
/// session cookie; expiry is enforced on every lookup.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
  pub token: Uuid,
  pub user_id: i64,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}
