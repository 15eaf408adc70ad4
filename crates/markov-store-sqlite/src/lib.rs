//! SQLite backend for the Markov chain model.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! connection thread without blocking the async runtime. That thread runs
//! one closure at a time, which is what makes each store primitive atomic.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

use markov_core::{Model, ModelConfig};

/// Open the store named by `config` and wrap it in a [`Model`].
///
/// Failing to open the database or create its schema surfaces as
/// [`Error::Database`], not as [`markov_core::Error::Storage`]; errors from
/// the model itself (e.g. an invalid `prefix_len`) arrive as [`Error::Core`].
pub async fn open_model(config: &ModelConfig) -> Result<Model<SqliteStore>> {
  let store = if config.is_in_memory() {
    SqliteStore::open_in_memory().await?
  } else {
    SqliteStore::open(&config.storage_path).await?
  };
  Ok(Model::new(store, config.params).await?)
}
