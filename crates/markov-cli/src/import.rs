//! Training input files.
//!
//! Collectors (feed readers, crawlers, chat exporters) write one text per
//! line, JSON-encoded as a string so that texts may contain newlines.

use std::path::Path;

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use markov_core::{ChainStore, Model};
use tokio::{
  fs::File,
  io::{AsyncBufReadExt as _, BufReader},
};

/// How each line of an input file encodes its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InputFormat {
  /// A JSON string literal per line.
  #[default]
  Json,
  /// The raw line is the text.
  Plain,
}

/// Decode one input line. Blank lines yield `None`.
pub fn decode_line(line: &str, format: InputFormat) -> Result<Option<String>> {
  if line.trim().is_empty() {
    return Ok(None);
  }
  match format {
    InputFormat::Json => {
      let text: String = serde_json::from_str(line).context("line is not a JSON string")?;
      Ok(Some(text))
    }
    InputFormat::Plain => Ok(Some(line.to_owned())),
  }
}

/// Train every text in `path`, returning how many texts were read.
///
/// Stops at the first undecodable line or storage failure; texts trained
/// before that stay in the model.
pub async fn import_file<S: ChainStore>(
  model: &Model<S>,
  path: &Path,
  format: InputFormat,
) -> Result<usize> {
  let file = File::open(path)
    .await
    .with_context(|| format!("opening {}", path.display()))?;
  let mut lines = BufReader::new(file).lines();

  let mut count = 0;
  let mut line_no = 0;
  while let Some(line) = lines
    .next_line()
    .await
    .with_context(|| format!("reading {}", path.display()))?
  {
    line_no += 1;
    let Some(text) = decode_line(&line, format)
      .with_context(|| format!("{}:{line_no}", path.display()))?
    else {
      continue;
    };

    let summary = model
      .train(&text)
      .await
      .with_context(|| format!("training {}:{line_no}", path.display()))?;
    tracing::debug!(
      file = %path.display(),
      line = line_no,
      transitions = summary.transitions,
      "trained text"
    );
    count += 1;
  }

  Ok(count)
}
