// tests/cart_sync_tests.rs
mod common;

use cart_sync::{CartStore, CartSyncClient, SessionStatus};
use common::{setup_tracing, FakeCartService};
use std::sync::Arc;

fn client_with_service() -> (CartSyncClient<Arc<FakeCartService>>, Arc<FakeCartService>, Arc<CartStore>) {
  let service = Arc::new(FakeCartService::new());
  let store = Arc::new(CartStore::new());
  let client = CartSyncClient::new(service.clone(), store.clone());
  (client, service, store)
}

#[tokio::test]
async fn login_transition_fetches_the_cart() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  service.seed_item(1, 10, 2);

  assert_eq!(store.status(), SessionStatus::Loading);
  client.on_session_change(SessionStatus::Authenticated).await;

  assert_eq!(store.total_quantity(), 2);
  assert_eq!(service.calls(), vec!["fetch"]);
}

#[tokio::test]
async fn loading_to_unauthenticated_resets_without_remote_call() {
  setup_tracing();
  let (client, service, store) = client_with_service();

  client.on_session_change(SessionStatus::Unauthenticated).await;

  assert!(store.snapshot().is_empty());
  assert!(service.calls().is_empty());
}

#[tokio::test]
async fn logout_resets_the_snapshot_regardless_of_prior_state() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  service.seed_item(1, 10, 2);
  service.seed_item(2, 11, 3);

  client.on_session_change(SessionStatus::Authenticated).await;
  assert_eq!(store.total_quantity(), 5);

  client.on_session_change(SessionStatus::Unauthenticated).await;
  assert!(store.snapshot().is_empty());
  assert_eq!(store.total_quantity(), 0);
  // Only the login fetch ever reached the service.
  assert_eq!(service.calls(), vec!["fetch"]);
}

#[tokio::test]
async fn mutations_while_unauthenticated_are_local_noops() {
  setup_tracing();
  let (client, service, store) = client_with_service();

  // Both while still loading and after an explicit unauthenticated signal.
  client.add(42, 2).await;
  client.on_session_change(SessionStatus::Unauthenticated).await;
  client.add(42, 2).await;
  client.update_quantity(7, 3).await;
  client.remove(7).await;
  client.fetch().await;

  assert!(service.calls().is_empty());
  assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn add_to_empty_cart_creates_one_line_item() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  client.on_session_change(SessionStatus::Authenticated).await;

  client.add(42, 2).await;

  assert_eq!(service.line_count(), 1);
  assert_eq!(service.quantity_of_product(42), Some(2));
  assert_eq!(store.total_quantity(), 2);
  assert_eq!(store.snapshot().line_items.len(), 1);
}

#[tokio::test]
async fn add_merges_into_an_existing_line_item() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  client.on_session_change(SessionStatus::Authenticated).await;

  client.add(42, 2).await;
  client.add(42, 3).await;

  // Merge, not duplicate: one row whose quantity is the sum.
  assert_eq!(service.line_count(), 1);
  assert_eq!(service.quantity_of_product(42), Some(5));
  assert_eq!(store.total_quantity(), 5);
}

#[tokio::test]
async fn add_raises_the_item_added_notice() {
  setup_tracing();
  let (client, _service, store) = client_with_service();
  client.on_session_change(SessionStatus::Authenticated).await;

  assert!(!store.item_added_notice());
  client.add(42, 1).await;
  assert!(store.item_added_notice());
}

#[tokio::test]
async fn update_quantity_clamps_to_a_minimum_of_one() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  service.seed_item(7, 42, 1);
  client.on_session_change(SessionStatus::Authenticated).await;

  client.update_quantity(7, 0).await;

  // The request that reached the service carried quantity 1, so the no-op
  // update leaves the line item at 1.
  assert!(service.calls().contains(&"update(7, 1)".to_string()));
  assert_eq!(service.quantity_of_line(7), Some(1));
  assert_eq!(store.total_quantity(), 1);
}

#[tokio::test]
async fn update_quantity_sets_and_refetches() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  service.seed_item(7, 42, 1);
  client.on_session_change(SessionStatus::Authenticated).await;

  client.update_quantity(7, 4).await;

  assert_eq!(service.quantity_of_line(7), Some(4));
  assert_eq!(store.total_quantity(), 4);
}

#[tokio::test]
async fn remove_drops_the_line_item_and_total_follows() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  service.seed_item(1, 10, 2);
  service.seed_item(2, 11, 3);
  client.on_session_change(SessionStatus::Authenticated).await;
  assert_eq!(store.total_quantity(), 5);

  client.remove(2).await;

  let snapshot = store.snapshot();
  assert_eq!(snapshot.line_items.len(), 1);
  assert_eq!(snapshot.line_items[0].id, 1);
  assert_eq!(snapshot.total_quantity, 2);
}

#[tokio::test]
async fn total_quantity_is_recomputed_when_the_service_omits_it() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  service.omit_total();
  service.seed_item(1, 10, 2);
  service.seed_item(2, 11, 3);

  client.on_session_change(SessionStatus::Authenticated).await;

  assert_eq!(store.total_quantity(), 5);
}

#[tokio::test]
async fn fetch_failure_resets_to_empty() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  service.seed_item(1, 10, 2);
  client.on_session_change(SessionStatus::Authenticated).await;
  assert_eq!(store.total_quantity(), 2);

  service.fail_op("fetch");
  client.fetch().await;

  // Better an empty cart than a stale authenticated-looking one.
  assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn mutation_failure_leaves_the_last_known_snapshot() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  service.seed_item(1, 10, 2);
  client.on_session_change(SessionStatus::Authenticated).await;

  service.fail_op("add");
  client.add(99, 1).await;
  service.fail_op("update");
  client.update_quantity(1, 5).await;
  service.fail_op("remove");
  client.remove(1).await;

  // No trailing fetch ran, and the snapshot is untouched.
  let snapshot = store.snapshot();
  assert_eq!(snapshot.line_items.len(), 1);
  assert_eq!(snapshot.total_quantity, 2);
  assert_eq!(service.quantity_of_line(1), Some(2));
}

#[tokio::test]
async fn mutating_a_foreign_line_item_is_rejected_and_snapshot_unchanged() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  service.seed_item(1, 10, 2);
  service.seed_foreign_item(55);
  client.on_session_change(SessionStatus::Authenticated).await;

  client.update_quantity(55, 3).await;
  client.remove(55).await;

  // The service answered 403 both times; no trailing fetch, no state change.
  let snapshot = store.snapshot();
  assert_eq!(snapshot.line_items.len(), 1);
  assert_eq!(snapshot.total_quantity, 2);
}

#[tokio::test]
async fn removing_an_unknown_line_item_changes_nothing() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  service.seed_item(1, 10, 2);
  client.on_session_change(SessionStatus::Authenticated).await;

  client.remove(777).await;

  assert_eq!(service.line_count(), 1);
  assert_eq!(store.total_quantity(), 2);
}

#[tokio::test]
async fn repeated_status_reports_do_not_refetch() {
  setup_tracing();
  let (client, service, _store) = client_with_service();
  client.on_session_change(SessionStatus::Authenticated).await;
  client.on_session_change(SessionStatus::Authenticated).await;

  assert_eq!(service.calls(), vec!["fetch"]);
}

#[tokio::test]
async fn login_logout_login_round_trip() {
  setup_tracing();
  let (client, service, store) = client_with_service();
  service.seed_item(1, 10, 2);

  client.on_session_change(SessionStatus::Authenticated).await;
  assert_eq!(store.total_quantity(), 2);

  client.on_session_change(SessionStatus::Unauthenticated).await;
  assert!(store.snapshot().is_empty());

  client.on_session_change(SessionStatus::Authenticated).await;
  assert_eq!(store.total_quantity(), 2);
  assert_eq!(service.calls(), vec!["fetch", "fetch"]);
}
