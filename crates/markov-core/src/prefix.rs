//! Tokens, prefixes and the sliding window used during generation.

use std::collections::VecDeque;

/// Surrogate id a store assigns to a prefix on first insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrefixId(pub i64);

/// Split text on runs of Unicode whitespace (including U+00A0), dropping
/// empty tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
  text.split_whitespace().collect()
}

/// Canonical prefix text: tokens joined by a single space.
pub fn join<S: AsRef<str>>(tokens: &[S]) -> String {
  let mut out = String::new();
  for (i, token) in tokens.iter().enumerate() {
    if i > 0 {
      out.push(' ');
    }
    out.push_str(token.as_ref());
  }
  out
}

/// The trailing `prefix_len` tokens of the text being generated.
#[derive(Debug, Clone)]
pub struct Window {
  tokens: VecDeque<String>,
}

impl Window {
  /// Build a window from exactly `tokens.len()` tokens.
  pub fn new<S: AsRef<str>>(tokens: &[S]) -> Self {
    Self { tokens: tokens.iter().map(|t| t.as_ref().to_owned()).collect() }
  }

  /// Prefix text of the current state.
  pub fn text(&self) -> String {
    join(&self.tokens.iter().collect::<Vec<_>>())
  }

  /// Drop the oldest token and append `next`.
  pub fn advance(&mut self, next: String) {
    self.tokens.pop_front();
    self.tokens.push_back(next);
  }
}
