// src/lib.rs

//! Client-side cart synchronization for the storefront.
//!
//! Two pieces cooperate here:
//!  - [`CartStore`]: the process-local authoritative-as-last-known snapshot
//!    of the cart, driven by session status transitions.
//!  - [`CartSyncClient`]: the four remote operations (fetch, add,
//!    update-quantity, remove) over a pluggable [`CartTransport`], each
//!    translating service responses into store updates.
//!
//! The store replaces its snapshot wholesale on every successful fetch and
//! discards out-of-order fetch completions through a monotonically
//! increasing token, so a slow response can never overwrite a newer one.

pub mod client;
pub mod error;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod transport;

// --- Re-exports for the Public API ---

pub use crate::client::CartSyncClient;
pub use crate::error::TransportError;
pub use crate::session::SessionStatus;
pub use crate::snapshot::{CartPayload, CartSnapshot, GalleryThumb, LineItem, ProductSummary};
pub use crate::store::{CartStore, FetchToken, ITEM_ADDED_NOTICE_TTL, MIN_LINE_QUANTITY};
pub use crate::transport::{CartTransport, HttpCartTransport};
