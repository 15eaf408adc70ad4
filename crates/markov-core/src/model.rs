//! [`Model`] — the public façade over a [`ChainStore`].
//!
//! The model owns its store for its whole lifetime and serialises every
//! write through a single gate. Reads never take the gate: a generation
//! racing a training call sees each prefix either before or after that
//! call's writes, with no snapshot isolation.

use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::sync::{Mutex, MutexGuard};

use crate::{
  Error, ModelStats, Parameters, PrefixId, Result, generate,
  store::ChainStore,
  train::TrainingFacts,
};

// ─── Summary ─────────────────────────────────────────────────────────────────

/// What a single [`Model::train`] call derived and whether it was stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainSummary {
  pub transitions: usize,
  pub chain_start: bool,
  /// `false` for dry runs and for texts that derive nothing.
  pub persisted:   bool,
}

// ─── Model ───────────────────────────────────────────────────────────────────

pub struct Model<S> {
  store:      S,
  params:     Parameters,
  write_gate: Mutex<()>,
}

impl<S: ChainStore> Model<S> {
  /// Wrap an opened store, creating its schema if absent.
  pub async fn new(store: S, params: Parameters) -> Result<Self> {
    params.validate()?;
    store.ensure_schema().await.map_err(Error::storage)?;
    Ok(Self { store, params, write_gate: Mutex::new(()) })
  }

  pub fn params(&self) -> Parameters {
    self.params
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Take exclusive write access for the lifetime of the returned guard.
  pub async fn write_access(&self) -> WriteAccess<'_, S> {
    WriteAccess { _gate: self.write_gate.lock().await, store: &self.store }
  }

  // ── Training ──────────────────────────────────────────────────────────

  /// Ingest one text.
  ///
  /// On a storage failure the remaining writes are abandoned; rows already
  /// written by this call are kept.
  pub async fn train(&self, text: &str) -> Result<TrainSummary> {
    let facts = TrainingFacts::derive(text, self.params.prefix_len);
    let mut summary = TrainSummary {
      transitions: facts.transitions.len(),
      chain_start: facts.chain_start.is_some(),
      persisted:   false,
    };

    if self.params.dry_run || facts.is_empty() {
      return Ok(summary);
    }

    self.write_access().await.persist(facts).await?;
    summary.persisted = true;
    Ok(summary)
  }

  /// Empty the model. Waits for in-flight training calls to finish.
  pub async fn clear(&self) -> Result<()> {
    self.write_access().await.clear().await
  }

  // ── Generation ────────────────────────────────────────────────────────

  /// A random chain start to begin generating from.
  pub async fn seed(&self) -> Result<String> {
    self
      .store
      .random_chain_start()
      .await
      .map_err(Error::storage)?
      .ok_or(Error::EmptyModel)
  }

  /// Extend `seed` (exactly `prefix_len` words) by at most
  /// `max_additional_tokens` tokens.
  pub async fn generate(&self, seed: &str, max_additional_tokens: usize) -> Result<String> {
    let mut rng = StdRng::from_os_rng();
    self.generate_with_rng(seed, max_additional_tokens, &mut rng).await
  }

  /// [`generate`](Self::generate) with a caller-supplied random source.
  pub async fn generate_with_rng<R>(
    &self,
    seed: &str,
    max_additional_tokens: usize,
    rng: &mut R,
  ) -> Result<String>
  where
    R: Rng + Send + ?Sized,
  {
    generate::walk(
      &self.store,
      seed,
      self.params.prefix_len,
      max_additional_tokens,
      rng,
    )
    .await
  }

  pub async fn stats(&self) -> Result<ModelStats> {
    self.store.stats().await.map_err(Error::storage)
  }

  /// Close the underlying store.
  pub async fn close(self) -> Result<()> {
    self.store.close().await.map_err(Error::storage)
  }
}

// ─── Write path ──────────────────────────────────────────────────────────────

/// Exclusive access to a model's write path.
///
/// Holding one guarantees no other training or clearing call runs until it
/// is dropped, which keeps prefix lookup-or-create atomic across whole
/// training calls.
pub struct WriteAccess<'a, S> {
  _gate: MutexGuard<'a, ()>,
  store: &'a S,
}

impl<S: ChainStore> WriteAccess<'_, S> {
  /// Store every transition, then the chain start.
  pub async fn persist(&self, facts: TrainingFacts) -> Result<()> {
    let mut ids: HashMap<String, PrefixId> = HashMap::new();

    for fact in facts.transitions {
      let id = match ids.get(&fact.prefix) {
        Some(id) => *id,
        None => {
          let id = self
            .store
            .lookup_or_create_prefix(fact.prefix.clone(), true)
            .await
            .map_err(Error::storage)?
            .ok_or_else(|| {
              Error::storage(std::io::Error::other(format!(
                "store did not create prefix {:?}",
                fact.prefix
              )))
            })?;
          ids.insert(fact.prefix, id);
          id
        }
      };

      self
        .store
        .append_transition(id, fact.token)
        .await
        .map_err(Error::storage)?;
    }

    if let Some(start) = facts.chain_start {
      self
        .store
        .append_chain_start(start)
        .await
        .map_err(Error::storage)?;
    }

    Ok(())
  }

  pub async fn clear(&self) -> Result<()> {
    self.store.clear_all().await.map_err(Error::storage)
  }
}
