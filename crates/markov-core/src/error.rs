//! Error types for `markov-core`.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
  /// The storage backend failed: medium unreachable, schema creation failed,
  /// or a read/write failed.
  #[error("storage error: {0}")]
  Storage(#[source] BoxError),

  /// No chain starts are recorded; train some text first.
  #[error("model is empty: no chain starts recorded")]
  EmptyModel,

  #[error("invalid seed: {0}")]
  InvalidSeed(String),

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

impl Error {
  pub(crate) fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
