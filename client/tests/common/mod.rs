// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use cart_sync::{CartPayload, CartTransport, GalleryThumb, LineItem, ProductSummary, TransportError};
use parking_lot::Mutex;
use tracing::Level;

/// In-memory stand-in for the cart service. Models the server's semantics:
/// merge-on-add by product identity, positive-integer quantity validation,
/// not-found on unknown line items. Records every call so tests can assert
/// that unauthenticated operations never reach the service.
pub struct FakeCartService {
  state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
  next_line_id: i64,
  items: Vec<FakeItem>,
  calls: Vec<String>,
  failing_ops: Vec<&'static str>,
  foreign_line_ids: Vec<i64>,
  omit_total: bool,
}

#[derive(Clone)]
struct FakeItem {
  id: i64,
  product_id: i64,
  quantity: i32,
}

impl FakeCartService {
  pub fn new() -> Self {
    FakeCartService {
      state: Mutex::new(FakeState {
        next_line_id: 1,
        ..Default::default()
      }),
    }
  }

  /// Pre-populates a line item, as if added in an earlier session.
  pub fn seed_item(&self, line_item_id: i64, product_id: i64, quantity: i32) {
    let mut state = self.state.lock();
    state.items.push(FakeItem {
      id: line_item_id,
      product_id,
      quantity,
    });
    state.next_line_id = state.next_line_id.max(line_item_id + 1);
  }

  /// Marks a line item id as belonging to some other user's cart: it never
  /// appears in fetch payloads, and mutating it yields a 403 (the service
  /// checks existence before ownership, so these ids are "found but not
  /// yours").
  pub fn seed_foreign_item(&self, line_item_id: i64) {
    self.state.lock().foreign_line_ids.push(line_item_id);
  }

  /// Makes the named operation ("fetch", "add", "update", "remove") fail
  /// with a synthetic transport error until cleared.
  pub fn fail_op(&self, op: &'static str) {
    self.state.lock().failing_ops.push(op);
  }

  pub fn clear_failures(&self) {
    self.state.lock().failing_ops.clear();
  }

  /// Omits `totalQuantity` from fetch payloads so the client has to
  /// recompute it.
  pub fn omit_total(&self) {
    self.state.lock().omit_total = true;
  }

  pub fn calls(&self) -> Vec<String> {
    self.state.lock().calls.clone()
  }

  pub fn line_count(&self) -> usize {
    self.state.lock().items.len()
  }

  pub fn quantity_of_product(&self, product_id: i64) -> Option<i32> {
    self
      .state
      .lock()
      .items
      .iter()
      .find(|item| item.product_id == product_id)
      .map(|item| item.quantity)
  }

  pub fn quantity_of_line(&self, line_item_id: i64) -> Option<i32> {
    self
      .state
      .lock()
      .items
      .iter()
      .find(|item| item.id == line_item_id)
      .map(|item| item.quantity)
  }

  fn check_failure(state: &FakeState, op: &str) -> Result<(), TransportError> {
    if state.failing_ops.contains(&op) {
      return Err(TransportError::Other(format!("injected {} failure", op)));
    }
    Ok(())
  }

  fn product_summary(product_id: i64) -> ProductSummary {
    ProductSummary {
      id: product_id,
      title: format!("Product {}", product_id),
      price_cents: 1999,
      discount_percent: None,
      thumbnail: None,
      colors: vec!["black".to_string()],
      sizes: vec!["M".to_string()],
      gallery: vec![GalleryThumb {
        thumbnail: format!("/images/{}.jpg", product_id),
      }],
    }
  }
}

#[async_trait]
impl CartTransport for FakeCartService {
  async fn fetch_cart(&self) -> Result<CartPayload, TransportError> {
    let mut state = self.state.lock();
    state.calls.push("fetch".to_string());
    Self::check_failure(&state, "fetch")?;

    let cart_items: Vec<LineItem> = state
      .items
      .iter()
      .map(|item| LineItem {
        id: item.id,
        product_id: item.product_id,
        quantity: item.quantity,
        product: Some(Self::product_summary(item.product_id)),
      })
      .collect();
    let total_quantity = if state.omit_total {
      None
    } else {
      Some(cart_items.iter().map(|item| item.quantity).sum())
    };
    Ok(CartPayload {
      cart_items,
      total_quantity,
    })
  }

  async fn add_item(&self, product_id: i64, quantity: i32) -> Result<(), TransportError> {
    let mut state = self.state.lock();
    state.calls.push(format!("add({}, {})", product_id, quantity));
    Self::check_failure(&state, "add")?;

    if quantity < 1 {
      return Err(TransportError::Status {
        status: 400,
        message: "Quantity must be a positive integer.".to_string(),
      });
    }
    if let Some(existing) = state.items.iter_mut().find(|item| item.product_id == product_id) {
      // Merge on product identity, never a duplicate row.
      existing.quantity += quantity;
    } else {
      let id = state.next_line_id;
      state.next_line_id += 1;
      state.items.push(FakeItem {
        id,
        product_id,
        quantity,
      });
    }
    Ok(())
  }

  async fn update_quantity(&self, line_item_id: i64, quantity: i32) -> Result<(), TransportError> {
    let mut state = self.state.lock();
    state.calls.push(format!("update({}, {})", line_item_id, quantity));
    Self::check_failure(&state, "update")?;

    if quantity < 1 {
      return Err(TransportError::Status {
        status: 400,
        message: "Quantity must be a positive integer.".to_string(),
      });
    }
    if state.foreign_line_ids.contains(&line_item_id) {
      return Err(TransportError::Status {
        status: 403,
        message: "You do not have access to this cart item.".to_string(),
      });
    }
    match state.items.iter_mut().find(|item| item.id == line_item_id) {
      Some(item) => {
        item.quantity = quantity;
        Ok(())
      }
      None => Err(TransportError::Status {
        status: 404,
        message: format!("Cart item with ID {} not found.", line_item_id),
      }),
    }
  }

  async fn remove_item(&self, line_item_id: i64) -> Result<(), TransportError> {
    let mut state = self.state.lock();
    state.calls.push(format!("remove({})", line_item_id));
    Self::check_failure(&state, "remove")?;

    if state.foreign_line_ids.contains(&line_item_id) {
      return Err(TransportError::Status {
        status: 403,
        message: "You do not have access to this cart item.".to_string(),
      });
    }
    let before = state.items.len();
    state.items.retain(|item| item.id != line_item_id);
    if state.items.len() == before {
      return Err(TransportError::Status {
        status: 404,
        message: format!("Cart item with ID {} not found.", line_item_id),
      });
    }
    Ok(())
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
