//! Error type for `markov-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] markov_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A count or id read back from SQLite was out of range.
  #[error("corrupt value in column {column}: {value}")]
  Corrupt { column: &'static str, value: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
