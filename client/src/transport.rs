// src/transport.rs

//! The seam between the sync client and the cart service. Production code
//! talks HTTP through [`HttpCartTransport`]; tests substitute an in-memory
//! fake.

use crate::error::TransportError;
use crate::snapshot::CartPayload;
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

/// The four remote operations of the cart service.
#[async_trait]
pub trait CartTransport: Send + Sync {
  async fn fetch_cart(&self) -> Result<CartPayload, TransportError>;
  async fn add_item(&self, product_id: i64, quantity: i32) -> Result<(), TransportError>;
  async fn update_quantity(&self, line_item_id: i64, quantity: i32) -> Result<(), TransportError>;
  async fn remove_item(&self, line_item_id: i64) -> Result<(), TransportError>;
}

// Sharing one transport between the session owner and the UI surfaces.
#[async_trait]
impl<T: CartTransport + ?Sized> CartTransport for std::sync::Arc<T> {
  async fn fetch_cart(&self) -> Result<CartPayload, TransportError> {
    (**self).fetch_cart().await
  }
  async fn add_item(&self, product_id: i64, quantity: i32) -> Result<(), TransportError> {
    (**self).add_item(product_id, quantity).await
  }
  async fn update_quantity(&self, line_item_id: i64, quantity: i32) -> Result<(), TransportError> {
    (**self).update_quantity(line_item_id, quantity).await
  }
  async fn remove_item(&self, line_item_id: i64) -> Result<(), TransportError> {
    (**self).remove_item(line_item_id).await
  }
}

/// HTTP implementation against the storefront server.
///
/// Constructed explicitly with its credential-inclusion policy: the reqwest
/// client carries a cookie store, so the session cookie set at signin rides
/// along on every cart call. No ambient global configuration.
pub struct HttpCartTransport {
  http: reqwest::Client,
  base_url: String,
}

impl HttpCartTransport {
  /// Builds a transport with its own cookie-carrying HTTP client.
  /// `base_url` is the API root, e.g. `http://localhost:8080/api/v1`.
  pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
    let http = reqwest::Client::builder().cookie_store(true).build()?;
    Ok(Self::with_client(http, base_url))
  }

  /// Uses a caller-provided client, e.g. to share one cookie jar between
  /// the auth flow and the cart flow.
  pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    HttpCartTransport { http, base_url }
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  /// Maps a non-2xx response to `TransportError::Status`, pulling the
  /// service's `message` field out of the body when there is one.
  async fn check(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }
    let message = match response.json::<serde_json::Value>().await {
      Ok(body) => body
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("(no message)")
        .to_string(),
      Err(_) => "(unreadable body)".to_string(),
    };
    Err(TransportError::Status {
      status: status.as_u16(),
      message,
    })
  }
}

#[async_trait]
impl CartTransport for HttpCartTransport {
  async fn fetch_cart(&self) -> Result<CartPayload, TransportError> {
    debug!("GET /cart");
    let response = self.http.get(self.url("/cart")).send().await?;
    let payload = Self::check(response).await?.json::<CartPayload>().await?;
    Ok(payload)
  }

  async fn add_item(&self, product_id: i64, quantity: i32) -> Result<(), TransportError> {
    debug!(product_id, quantity, "POST /cart");
    let response = self
      .http
      .post(self.url("/cart"))
      .json(&json!({ "productId": product_id, "quantity": quantity }))
      .send()
      .await?;
    Self::check(response).await?;
    Ok(())
  }

  async fn update_quantity(&self, line_item_id: i64, quantity: i32) -> Result<(), TransportError> {
    debug!(line_item_id, quantity, "PATCH /cart/{{id}}");
    let response = self
      .http
      .patch(self.url(&format!("/cart/{}", line_item_id)))
      .json(&json!({ "quantity": quantity }))
      .send()
      .await?;
    Self::check(response).await?;
    Ok(())
  }

  async fn remove_item(&self, line_item_id: i64) -> Result<(), TransportError> {
    debug!(line_item_id, "DELETE /cart/{{id}}");
    let response = self.http.delete(self.url(&format!("/cart/{}", line_item_id))).send().await?;
    Self::check(response).await?;
    Ok(())
  }
}
