//! The `ChainStore` trait — raw primitives over persistent model storage.
//!
//! The trait is implemented by storage backends (e.g. `markov-store-sqlite`).
//! Callers go through [`Model`](crate::Model), which serialises the write
//! path; the primitives themselves only promise per-call atomicity.

use std::future::Future;

use crate::prefix::PrefixId;

/// Row counts of the three collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStats {
  pub prefixes:     u64,
  pub transitions:  u64,
  pub chain_starts: u64,
}

impl ModelStats {
  pub fn is_empty(&self) -> bool {
    self.prefixes == 0 && self.transitions == 0 && self.chain_starts == 0
  }
}

/// Abstraction over a Markov chain storage backend.
///
/// Prefixes and chain starts are sets keyed by text. Transitions form a
/// multiset: every stored `(prefix, token)` row counts once towards the
/// probability of `token` following `prefix`, so backends must never
/// deduplicate or aggregate them.
pub trait ChainStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the collections and uniqueness constraints if absent.
  /// Idempotent.
  fn ensure_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Return the id of `text`, inserting it first when absent and `create`
  /// is set. Returns `None` only when absent and `create` is unset.
  ///
  /// Two concurrent calls with the same unseen text must not both insert.
  fn lookup_or_create_prefix(
    &self,
    text: String,
    create: bool,
  ) -> impl Future<Output = Result<Option<PrefixId>, Self::Error>> + Send + '_;

  /// Append one transition row. No uniqueness constraint applies.
  fn append_transition(
    &self,
    prefix_id: PrefixId,
    token: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Record `text` as a chain start. Already-present text is a no-op.
  fn append_chain_start(
    &self,
    text: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Empty all three collections, all or nothing.
  fn clear_all(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every stored next token for `prefix`, duplicates included, in
  /// insertion order. Empty when the prefix is unknown.
  fn successors_of(
    &self,
    prefix: String,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// One chain start chosen uniformly at random, or `None` when there are
  /// none.
  fn random_chain_start(
    &self,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  fn stats(&self) -> impl Future<Output = Result<ModelStats, Self::Error>> + Send + '_;

  /// Release the underlying handle.
  fn close(self) -> impl Future<Output = Result<(), Self::Error>> + Send
  where
    Self: Sized;
}
