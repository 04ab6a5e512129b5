// src/session.rs

/// Identity status as reported by the external session provider.
///
/// The cart state machine is driven purely by transitions between these
/// values; `Loading` is the initial state and suspends all cart operations
/// until identity resolves one way or the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
  #[default]
  Loading,
  Authenticated,
  Unauthenticated,
}
