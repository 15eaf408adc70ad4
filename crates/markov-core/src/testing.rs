//! In-memory [`ChainStore`] used by the unit tests of this crate.

use std::{
  convert::Infallible,
  io,
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use crate::{ModelStats, PrefixId, store::ChainStore};

#[derive(Default)]
struct Tables {
  prefixes:     Vec<String>,
  transitions:  Vec<(PrefixId, String)>,
  chain_starts: Vec<String>,
}

#[derive(Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl MemoryStore {
  /// Record one transition directly, bypassing the model.
  pub fn insert(&self, prefix: &str, token: &str) {
    let mut t = self.tables.lock().unwrap();
    let id = lookup(&mut t, prefix, true).unwrap();
    t.transitions.push((id, token.to_owned()));
  }

  pub fn chain_starts(&self) -> Vec<String> {
    self.tables.lock().unwrap().chain_starts.clone()
  }
}

fn lookup(t: &mut Tables, text: &str, create: bool) -> Option<PrefixId> {
  if let Some(pos) = t.prefixes.iter().position(|p| p == text) {
    return Some(PrefixId(pos as i64));
  }
  if !create {
    return None;
  }
  t.prefixes.push(text.to_owned());
  Some(PrefixId(t.prefixes.len() as i64 - 1))
}

impl ChainStore for MemoryStore {
  type Error = Infallible;

  async fn ensure_schema(&self) -> Result<(), Infallible> {
    Ok(())
  }

  async fn lookup_or_create_prefix(
    &self,
    text: String,
    create: bool,
  ) -> Result<Option<PrefixId>, Infallible> {
    Ok(lookup(&mut self.tables.lock().unwrap(), &text, create))
  }

  async fn append_transition(&self, prefix_id: PrefixId, token: String) -> Result<(), Infallible> {
    self.tables.lock().unwrap().transitions.push((prefix_id, token));
    Ok(())
  }

  async fn append_chain_start(&self, text: String) -> Result<(), Infallible> {
    let mut t = self.tables.lock().unwrap();
    if !t.chain_starts.contains(&text) {
      t.chain_starts.push(text);
    }
    Ok(())
  }

  async fn clear_all(&self) -> Result<(), Infallible> {
    *self.tables.lock().unwrap() = Tables::default();
    Ok(())
  }

  async fn successors_of(&self, prefix: String) -> Result<Vec<String>, Infallible> {
    let mut t = self.tables.lock().unwrap();
    let Some(id) = lookup(&mut t, &prefix, false) else {
      return Ok(Vec::new());
    };
    Ok(
      t.transitions
        .iter()
        .filter(|(p, _)| *p == id)
        .map(|(_, token)| token.clone())
        .collect(),
    )
  }

  async fn random_chain_start(&self) -> Result<Option<String>, Infallible> {
    Ok(self.tables.lock().unwrap().chain_starts.first().cloned())
  }

  async fn stats(&self) -> Result<ModelStats, Infallible> {
    let t = self.tables.lock().unwrap();
    Ok(ModelStats {
      prefixes:     t.prefixes.len() as u64,
      transitions:  t.transitions.len() as u64,
      chain_starts: t.chain_starts.len() as u64,
    })
  }

  async fn close(self) -> Result<(), Infallible> {
    Ok(())
  }
}

/// Wraps a [`MemoryStore`] and fails the `fail_on`-th `append_transition`
/// call (1-based) and every call after it.
pub struct FailingStore {
  pub inner:   MemoryStore,
  fail_on:     usize,
  transitions: AtomicUsize,
}

impl FailingStore {
  pub fn new(fail_on: usize) -> Self {
    Self { inner: MemoryStore::default(), fail_on, transitions: AtomicUsize::new(0) }
  }
}

impl ChainStore for FailingStore {
  type Error = io::Error;

  async fn ensure_schema(&self) -> io::Result<()> {
    Ok(())
  }

  async fn lookup_or_create_prefix(
    &self,
    text: String,
    create: bool,
  ) -> io::Result<Option<PrefixId>> {
    Ok(lookup(&mut self.inner.tables.lock().unwrap(), &text, create))
  }

  async fn append_transition(&self, prefix_id: PrefixId, token: String) -> io::Result<()> {
    let call = self.transitions.fetch_add(1, Ordering::SeqCst) + 1;
    if call >= self.fail_on {
      return Err(io::Error::other("disk full"));
    }
    self.inner.tables.lock().unwrap().transitions.push((prefix_id, token));
    Ok(())
  }

  async fn append_chain_start(&self, text: String) -> io::Result<()> {
    let mut t = self.inner.tables.lock().unwrap();
    if !t.chain_starts.contains(&text) {
      t.chain_starts.push(text);
    }
    Ok(())
  }

  async fn clear_all(&self) -> io::Result<()> {
    *self.inner.tables.lock().unwrap() = Tables::default();
    Ok(())
  }

  async fn successors_of(&self, prefix: String) -> io::Result<Vec<String>> {
    Ok(self.inner.successors_of(prefix).await.unwrap_or_default())
  }

  async fn random_chain_start(&self) -> io::Result<Option<String>> {
    Ok(self.inner.chain_starts().first().cloned())
  }

  async fn stats(&self) -> io::Result<ModelStats> {
    Ok(self.inner.stats().await.unwrap_or_default())
  }

  async fn close(self) -> io::Result<()> {
    Ok(())
  }
}
