//! Turning raw text into prefix / transition / chain-start facts.

use crate::prefix::{join, tokenize};

/// One observed `(prefix, next token)` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionFact {
  pub prefix: String,
  pub token:  String,
}

/// Everything a single text contributes to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingFacts {
  /// In text order; repeated pairs are kept.
  pub transitions: Vec<TransitionFact>,
  pub chain_start: Option<String>,
}

impl TrainingFacts {
  /// Derive the facts of `text` for windows of `prefix_len` tokens.
  ///
  /// Texts with at most `prefix_len` tokens yield nothing.
  pub fn derive(text: &str, prefix_len: usize) -> Self {
    let tokens = tokenize(text);
    if prefix_len == 0 || tokens.len() <= prefix_len {
      return Self::default();
    }

    let transitions = tokens
      .windows(prefix_len + 1)
      .map(|w| TransitionFact {
        prefix: join(&w[..prefix_len]),
        token:  w[prefix_len].to_owned(),
      })
      .collect();

    Self {
      transitions,
      chain_start: Some(join(&tokens[..prefix_len])),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.transitions.is_empty() && self.chain_start.is_none()
  }
}
