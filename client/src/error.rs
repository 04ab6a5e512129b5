// src/error.rs

use thiserror::Error;

/// Failures surfaced by a [`crate::CartTransport`] implementation. The sync
/// client treats every variant the same way: log, leave the snapshot alone
/// (fetch excepted), no retry.
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("HTTP transport error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Cart service responded {status}: {message}")]
  Status { status: u16, message: String },

  /// For non-HTTP transports (in-memory fakes, future IPC backends).
  #[error("{0}")]
  Other(String),
}
