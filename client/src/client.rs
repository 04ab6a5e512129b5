// src/client.rs

//! The sync client: four remote operations, each gated on an authenticated
//! session and each translating its completion into a store update.

use crate::session::SessionStatus;
use crate::store::{CartStore, MIN_LINE_QUANTITY};
use crate::transport::CartTransport;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Explicitly constructed over a transport and a store; nothing here is
/// process-global. Whatever owns the session lifecycle calls
/// [`CartSyncClient::on_session_change`] and the UI surfaces call the
/// operations.
pub struct CartSyncClient<T: CartTransport> {
  transport: T,
  store: Arc<CartStore>,
}

impl<T: CartTransport> CartSyncClient<T> {
  pub fn new(transport: T, store: Arc<CartStore>) -> Self {
    CartSyncClient { transport, store }
  }

  pub fn store(&self) -> &Arc<CartStore> {
    &self.store
  }

  /// Drives the session state machine:
  ///
  /// ```text
  /// loading -> authenticated   : fetch()
  /// loading -> unauthenticated : reset to empty
  /// authenticated -> unauthenticated : reset to empty (logout)
  /// unauthenticated -> authenticated : fetch() (login)
  /// ```
  ///
  /// Re-reporting the current status is a no-op.
  pub async fn on_session_change(&self, status: SessionStatus) {
    let previous = self.store.set_status(status);
    if previous == status {
      return;
    }
    debug!(?previous, ?status, "Session status changed.");
    match status {
      SessionStatus::Authenticated => self.fetch().await,
      SessionStatus::Unauthenticated => self.store.reset(),
      SessionStatus::Loading => {} // no defined transition re-enters loading
    }
  }

  /// Retrieves the full cart and replaces the store snapshot wholesale.
  /// On failure the snapshot resets to empty rather than staying stale.
  pub async fn fetch(&self) {
    if !self.require_authenticated("fetch") {
      return;
    }
    let token = self.store.begin_fetch();
    match self.transport.fetch_cart().await {
      Ok(payload) => {
        let snapshot = payload.into_snapshot();
        if self.store.complete_fetch(token, snapshot) {
          info!(total_quantity = self.store.total_quantity(), "Cart snapshot replaced.");
        } else {
          debug!("Discarded out-of-order fetch completion.");
        }
      }
      Err(error) => {
        warn!(%error, "fetch: cart fetch failed; resetting snapshot.");
        self.store.fail_fetch(token);
      }
    }
  }

  /// Asks the service to add `quantity` of a product (merging into an
  /// existing line item server-side), then re-derives the snapshot with a
  /// chained fetch and raises the "item added" notice. Quantity positivity
  /// is the caller's responsibility; the service rejects non-positive
  /// values.
  pub async fn add(&self, product_id: i64, quantity: i32) {
    if !self.require_authenticated("add") {
      return;
    }
    match self.transport.add_item(product_id, quantity).await {
      Ok(()) => {
        debug!(product_id, quantity, "add: accepted by service.");
        self.fetch().await;
        self.store.notice_item_added();
      }
      Err(error) => {
        warn!(%error, product_id, quantity, "add: cart service call failed; snapshot unchanged.");
      }
    }
  }

  /// Sets a line item's quantity, clamping the request to a minimum of 1
  /// before sending. Chains a fetch on success.
  pub async fn update_quantity(&self, line_item_id: i64, quantity: i32) {
    if !self.require_authenticated("update_quantity") {
      return;
    }
    let quantity = quantity.max(MIN_LINE_QUANTITY);
    match self.transport.update_quantity(line_item_id, quantity).await {
      Ok(()) => {
        debug!(line_item_id, quantity, "update_quantity: accepted by service.");
        self.fetch().await;
      }
      Err(error) => {
        warn!(%error, line_item_id, quantity, "update_quantity: cart service call failed; snapshot unchanged.");
      }
    }
  }

  /// Removes a line item. Chains a fetch on success.
  pub async fn remove(&self, line_item_id: i64) {
    if !self.require_authenticated("remove") {
      return;
    }
    match self.transport.remove_item(line_item_id).await {
      Ok(()) => {
        debug!(line_item_id, "remove: accepted by service.");
        self.fetch().await;
      }
      Err(error) => {
        warn!(%error, line_item_id, "remove: cart service call failed; snapshot unchanged.");
      }
    }
  }

  /// Precondition shared by all four operations: anything but
  /// `Authenticated` logs and makes the operation a no-op, without
  /// contacting the service.
  fn require_authenticated(&self, operation: &str) -> bool {
    let status = self.store.status();
    if status == SessionStatus::Authenticated {
      true
    } else {
      warn!(operation, ?status, "Cart operation skipped: session not authenticated.");
      false
    }
  }
}
