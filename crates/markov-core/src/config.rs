//! Model configuration.

use serde::Deserialize;

use crate::{Error, Result};

/// Storage identifier that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

const DEFAULT_PREFIX_LEN: usize = 3;

/// Parameters that shape training and generation.
///
/// `prefix_len` must not change once a store holds data: prefixes recorded
/// under one window length are never matched by lookups under another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Parameters {
  /// Number of tokens in a prefix window (N).
  #[serde(default = "default_prefix_len")]
  pub prefix_len: usize,
  /// Derive facts but never persist them.
  #[serde(default)]
  pub dry_run:    bool,
}

impl Parameters {
  pub fn new(prefix_len: usize) -> Self {
    Self { prefix_len, dry_run: false }
  }

  pub fn dry_run(mut self, dry_run: bool) -> Self {
    self.dry_run = dry_run;
    self
  }

  pub(crate) fn validate(&self) -> Result<()> {
    if self.prefix_len == 0 {
      return Err(Error::InvalidConfig("prefix_len must be at least 1".into()));
    }
    Ok(())
  }
}

impl Default for Parameters {
  fn default() -> Self {
    Self::new(DEFAULT_PREFIX_LEN)
  }
}

fn default_prefix_len() -> usize {
  DEFAULT_PREFIX_LEN
}

/// Everything needed to open a model: where the store lives and how the
/// model behaves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelConfig {
  /// A database file path, or [`IN_MEMORY`].
  pub storage_path: String,
  #[serde(flatten)]
  pub params:       Parameters,
}

impl ModelConfig {
  pub fn new(storage_path: impl Into<String>) -> Self {
    Self { storage_path: storage_path.into(), params: Parameters::default() }
  }

  pub fn in_memory() -> Self {
    Self::new(IN_MEMORY)
  }

  pub fn is_in_memory(&self) -> bool {
    self.storage_path == IN_MEMORY
  }
}
