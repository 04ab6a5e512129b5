// server/src/services/auth_service.rs

//! Password hashing, credential verification, and server-side sessions.

use crate::errors::{AppError, Result};
use crate::models::{Session, User};
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a plain-text password against a stored Argon2 hash.
/// Returns `Ok(false)` on a clean mismatch; errors are reserved for
/// malformed stored hashes or internal verifier failures.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool> {
  if hashed_password_str.is_empty() || provided_password.is_empty() {
    return Err(AppError::Auth("Invalid credentials.".to_string()));
  }
  let parsed_hash = PasswordHash::new(hashed_password_str)
    .map_err(|e| AppError::Internal(format!("Invalid stored password hash format: {}", e)))?;
  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(e) => Err(AppError::Internal(format!("Password verification failed: {}", e))),
  }
}

/// Canonical form used for storage and lookup: trimmed, lowercased.
pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

#[instrument(name = "auth_service::signup", skip(pool, password), fields(email = %email))]
pub async fn signup(
  pool: &PgPool,
  email: &str,
  password: &str,
  first_name: Option<&str>,
  last_name: Option<&str>,
) -> Result<User> {
  let email = normalize_email(email);
  if email.is_empty() {
    return Err(AppError::Validation("Email cannot be empty.".to_string()));
  }
  let password_hash = hash_password(password)?;

  let user = sqlx::query_as::<_, User>(
    "INSERT INTO users (email, password_hash, first_name, last_name) VALUES ($1, $2, $3, $4) \
     RETURNING id, email, password_hash, first_name, last_name, created_at, updated_at",
  )
  .bind(&email)
  .bind(&password_hash)
  .bind(first_name)
  .bind(last_name)
  .fetch_one(pool)
  .await
  .map_err(|e| {
    if let sqlx::Error::Database(db_err) = &e {
      if db_err.is_unique_violation() {
        return AppError::Validation("Email is already registered.".to_string());
      }
    }
    AppError::Sqlx(e)
  })?;

  debug!(user_id = user.id, "User created.");
  Ok(user)
}

/// Verifies credentials and, on success, returns the matching user.
/// A missing user and a wrong password produce the same error so the
/// response does not reveal which accounts exist.
#[instrument(name = "auth_service::signin", skip(pool, password), fields(email = %email))]
pub async fn signin(pool: &PgPool, email: &str, password: &str) -> Result<User> {
  let email = normalize_email(email);

  let user = sqlx::query_as::<_, User>(
    "SELECT id, email, password_hash, first_name, last_name, created_at, updated_at FROM users WHERE email = $1",
  )
  .bind(&email)
  .fetch_optional(pool)
  .await?;

  let Some(user) = user else {
    warn!("Signin failed: unknown email.");
    return Err(AppError::Auth("Invalid email or password.".to_string()));
  };

  if !verify_password(&user.password_hash, password)? {
    warn!(user_id = user.id, "Signin failed: password mismatch.");
    return Err(AppError::Auth("Invalid email or password.".to_string()));
  }

  Ok(user)
}

/// Inserts a new session row for the user and returns it. The token is the
/// value the handler places into the session cookie.
#[instrument(name = "auth_service::create_session", skip(pool))]
pub async fn create_session(pool: &PgPool, user_id: i64, ttl_days: i64) -> Result<Session> {
  let token = Uuid::new_v4();
  let expires_at = Utc::now() + Duration::days(ttl_days);

  let session = sqlx::query_as::<_, Session>(
    "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3) \
     RETURNING token, user_id, created_at, expires_at",
  )
  .bind(token)
  .bind(user_id)
  .bind(expires_at)
  .fetch_one(pool)
  .await?;

  Ok(session)
}

#[derive(Debug, PartialEq, Eq)]
enum SessionLookup {
  Missing,
  /// Past expiry; the row should be deleted so the table does not grow
  /// without bound.
  Expired(Uuid),
  Current(i64),
}

fn classify_session(session: Option<Session>, now: chrono::DateTime<Utc>) -> SessionLookup {
  match session {
    None => SessionLookup::Missing,
    Some(s) if s.expires_at > now => SessionLookup::Current(s.user_id),
    Some(s) => SessionLookup::Expired(s.token),
  }
}

/// Resolves a session token to the owning user id, or `None` if the token
/// is unknown or past its expiry. Expired rows are reaped on the spot.
pub async fn resolve_session(pool: &PgPool, token: Uuid) -> Result<Option<i64>> {
  let session = sqlx::query_as::<_, Session>(
    "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = $1",
  )
  .bind(token)
  .fetch_optional(pool)
  .await?;

  match classify_session(session, Utc::now()) {
    SessionLookup::Current(user_id) => Ok(Some(user_id)),
    SessionLookup::Missing => Ok(None),
    SessionLookup::Expired(token) => {
      delete_session(pool, token).await?;
      Ok(None)
    }
  }
}

/// Deleting an unknown token is not an error; signout is idempotent.
#[instrument(name = "auth_service::delete_session", skip(pool, token))]
pub async fn delete_session(pool: &PgPool, token: Uuid) -> Result<()> {
  sqlx::query("DELETE FROM sessions WHERE token = $1")
    .bind(token)
    .execute(pool)
    .await?;
  Ok(())
}
