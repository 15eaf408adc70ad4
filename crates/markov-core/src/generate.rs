//! Weighted random walk over stored transitions.
//!
//! The walk is a first-order Markov process whose state is the last
//! `prefix_len` tokens. A state with no recorded successors is absorbing.

use rand::{Rng, seq::IndexedRandom as _};

use crate::{
  Error, Result,
  prefix::{Window, join, tokenize},
  store::ChainStore,
};

/// Split `seed` into its window tokens, enforcing exactly `prefix_len` of
/// them.
pub fn parse_seed(seed: &str, prefix_len: usize) -> Result<Vec<&str>> {
  let tokens = tokenize(seed);
  if tokens.is_empty() {
    return Err(Error::InvalidSeed("seed is empty".into()));
  }
  if tokens.len() != prefix_len {
    return Err(Error::InvalidSeed(format!(
      "expected {prefix_len} words, got {}",
      tokens.len()
    )));
  }
  Ok(tokens)
}

/// Extend `seed` by at most `max_tokens` tokens drawn from `store`.
///
/// Each step samples uniformly over the successor rows of the current
/// window, so a token stored three times is three times as likely as one
/// stored once.
pub async fn walk<S, R>(
  store: &S,
  seed: &str,
  prefix_len: usize,
  max_tokens: usize,
  rng: &mut R,
) -> Result<String>
where
  S: ChainStore,
  R: Rng + Send + ?Sized,
{
  let seed_tokens = parse_seed(seed, prefix_len)?;
  let mut window = Window::new(&seed_tokens);
  let mut output: Vec<String> = seed_tokens.iter().map(|t| (*t).to_owned()).collect();

  for _ in 0..max_tokens {
    let successors = store
      .successors_of(window.text())
      .await
      .map_err(Error::storage)?;

    // End of chain.
    let Some(next) = successors.choose(rng).cloned() else {
      break;
    };

    output.push(next.clone());
    window.advance(next);
  }

  Ok(join(&output))
}
