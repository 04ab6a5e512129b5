// src/store.rs

//! The process-local cart store. All UI surfaces read snapshots from here;
//! only the sync client's completion paths write to it.

use crate::session::SessionStatus;
use crate::snapshot::CartSnapshot;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// How long the transient "item added" notice stays visible.
pub const ITEM_ADDED_NOTICE_TTL: Duration = Duration::from_secs(5);

/// Lowest quantity the client will ever send for an update; requests below
/// this are clamped before they reach the service.
pub const MIN_LINE_QUANTITY: i32 = 1;

/// Token for one fetch attempt. Completions carrying a token older than the
/// latest issued one are discarded, which prevents an out-of-order fetch
/// response from overwriting a newer snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

#[derive(Debug)]
struct StoreInner {
  status: SessionStatus,
  snapshot: CartSnapshot,
  issued_token: u64,
  item_added_at: Option<Instant>,
}

#[derive(Debug)]
pub struct CartStore {
  inner: Mutex<StoreInner>,
}

impl Default for CartStore {
  fn default() -> Self {
    Self::new()
  }
}

impl CartStore {
  /// A fresh store: status `Loading`, empty snapshot.
  pub fn new() -> Self {
    CartStore {
      inner: Mutex::new(StoreInner {
        status: SessionStatus::Loading,
        snapshot: CartSnapshot::default(),
        issued_token: 0,
        item_added_at: None,
      }),
    }
  }

  pub fn status(&self) -> SessionStatus {
    self.inner.lock().status
  }

  /// Records the new session status and returns the previous one, so the
  /// caller can act on the transition rather than the absolute value.
  pub fn set_status(&self, status: SessionStatus) -> SessionStatus {
    let mut guard = self.inner.lock();
    std::mem::replace(&mut guard.status, status)
  }

  /// A clone of the last-known snapshot.
  pub fn snapshot(&self) -> CartSnapshot {
    self.inner.lock().snapshot.clone()
  }

  pub fn total_quantity(&self) -> i32 {
    self.inner.lock().snapshot.total_quantity
  }

  /// Issues the token for a new fetch attempt, invalidating all earlier
  /// in-flight attempts.
  pub fn begin_fetch(&self) -> FetchToken {
    let mut guard = self.inner.lock();
    guard.issued_token += 1;
    FetchToken(guard.issued_token)
  }

  /// Applies a successful fetch. Returns false (and changes nothing) when a
  /// newer fetch has been issued since this token.
  pub fn complete_fetch(&self, token: FetchToken, snapshot: CartSnapshot) -> bool {
    let mut guard = self.inner.lock();
    if token.0 != guard.issued_token {
      return false;
    }
    guard.snapshot = snapshot;
    true
  }

  /// Applies a failed fetch: reset to empty, so a possibly signed-out user
  /// is never shown a stale authenticated-looking cart. Stale failures are
  /// discarded like stale successes.
  pub fn fail_fetch(&self, token: FetchToken) -> bool {
    let mut guard = self.inner.lock();
    if token.0 != guard.issued_token {
      return false;
    }
    guard.snapshot = CartSnapshot::default();
    true
  }

  /// Immediate reset, no remote call: the unauthenticated transition. Also
  /// invalidates any in-flight fetch so its late completion cannot
  /// resurrect the old cart.
  pub fn reset(&self) {
    let mut guard = self.inner.lock();
    guard.issued_token += 1;
    guard.snapshot = CartSnapshot::default();
    guard.item_added_at = None;
  }

  /// Raises the transient "item added" notice.
  pub fn notice_item_added(&self) {
    self.inner.lock().item_added_at = Some(Instant::now());
  }

  /// Whether the notice is currently visible; it auto-dismisses once
  /// [`ITEM_ADDED_NOTICE_TTL`] has elapsed.
  pub fn item_added_notice(&self) -> bool {
    let mut guard = self.inner.lock();
    match guard.item_added_at {
      Some(raised_at) if raised_at.elapsed() < ITEM_ADDED_NOTICE_TTL => true,
      Some(_) => {
        guard.item_added_at = None;
        false
      }
      None => false,
    }
  }

  /// Manual dismissal, for a close button on the notice.
  pub fn dismiss_item_added(&self) {
    self.inner.lock().item_added_at = None;
  }

  #[cfg(test)]
  fn backdate_notice(&self, by: Duration) {
    let mut guard = self.inner.lock();
    if let Some(raised_at) = guard.item_added_at.as_mut() {
      *raised_at -= by;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::snapshot::LineItem;

  fn snapshot_with(quantities: &[i32]) -> CartSnapshot {
    let line_items: Vec<LineItem> = quantities
      .iter()
      .enumerate()
      .map(|(i, &quantity)| LineItem {
        id: i as i64 + 1,
        product_id: i as i64 + 100,
        quantity,
        product: None,
      })
      .collect();
    let total_quantity = quantities.iter().sum();
    CartSnapshot {
      line_items,
      total_quantity,
    }
  }

  #[test]
  fn new_store_is_loading_and_empty() {
    let store = CartStore::new();
    assert_eq!(store.status(), SessionStatus::Loading);
    assert!(store.snapshot().is_empty());
    assert_eq!(store.total_quantity(), 0);
  }

  #[test]
  fn current_fetch_applies() {
    let store = CartStore::new();
    let token = store.begin_fetch();
    assert!(store.complete_fetch(token, snapshot_with(&[2, 3])));
    assert_eq!(store.total_quantity(), 5);
  }

  #[test]
  fn stale_fetch_completion_is_discarded() {
    let store = CartStore::new();
    let first = store.begin_fetch();
    let second = store.begin_fetch();

    // Second (newer) fetch lands first.
    assert!(store.complete_fetch(second, snapshot_with(&[7])));
    // First fetch completes late; its snapshot must not win.
    assert!(!store.complete_fetch(first, snapshot_with(&[1])));
    assert_eq!(store.total_quantity(), 7);
  }

  #[test]
  fn stale_fetch_failure_does_not_clear_newer_snapshot() {
    let store = CartStore::new();
    let first = store.begin_fetch();
    let second = store.begin_fetch();

    assert!(store.complete_fetch(second, snapshot_with(&[4])));
    assert!(!store.fail_fetch(first));
    assert_eq!(store.total_quantity(), 4);
  }

  #[test]
  fn current_fetch_failure_resets_to_empty() {
    let store = CartStore::new();
    let token = store.begin_fetch();
    assert!(store.complete_fetch(token, snapshot_with(&[4])));

    let token = store.begin_fetch();
    assert!(store.fail_fetch(token));
    assert!(store.snapshot().is_empty());
  }

  #[test]
  fn reset_clears_state_and_invalidates_inflight_fetch() {
    let store = CartStore::new();
    let inflight = store.begin_fetch();
    store.reset();

    assert!(store.snapshot().is_empty());
    // The pre-reset fetch must not resurrect a cart after logout.
    assert!(!store.complete_fetch(inflight, snapshot_with(&[9])));
    assert!(store.snapshot().is_empty());
  }

  #[test]
  fn item_added_notice_auto_dismisses_after_ttl() {
    let store = CartStore::new();
    assert!(!store.item_added_notice());

    store.notice_item_added();
    assert!(store.item_added_notice());

    store.backdate_notice(ITEM_ADDED_NOTICE_TTL + Duration::from_millis(1));
    assert!(!store.item_added_notice());
    // Stays dismissed.
    assert!(!store.item_added_notice());
  }

  #[test]
  fn item_added_notice_supports_manual_dismissal() {
    let store = CartStore::new();
    store.notice_item_added();
    store.dismiss_item_added();
    assert!(!store.item_added_notice());
  }
}
