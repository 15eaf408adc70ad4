//! `markov` — train and sample a persistent Markov chain text model.
//!
//! # Usage
//!
//! ```
//! markov --db ~/chain.db import feeds.jsonl tweets.jsonl
//! markov generate --len 50
//! markov --prefix-len 2 generate Once upon
//! ```
//!
//! Settings come from `markov.toml` (or `--config`), then `MARKOV_*`
//! environment variables, then command-line flags.

mod import;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use import::InputFormat;
use markov_core::ModelConfig;
use tokio::task::JoinSet;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_STORAGE_PATH: &str = "/tmp/markov.db";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Persistent Markov chain text model")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "markov.toml", global = true)]
  config: PathBuf,

  /// Chain database file, or `:memory:`.
  #[arg(long, global = true)]
  db: Option<String>,

  /// Number of words in a prefix window.
  #[arg(long, global = true)]
  prefix_len: Option<usize>,

  /// Derive training facts without storing them.
  #[arg(long, global = true)]
  dry_run: bool,

  /// Increase verbosity.
  #[arg(long, global = true)]
  debug: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Train the model from input files, one text per line.
  Import {
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Encoding of each line.
    #[arg(long, value_enum, default_value_t)]
    format: InputFormat,
  },

  /// Generate text from the given seed words, or from a random chain start.
  Generate {
    /// Exactly `prefix-len` words.
    words: Vec<String>,

    /// Maximum number of words to add after the seed.
    #[arg(short, long, default_value_t = 200)]
    len: usize,
  },

  /// Print a random chain start.
  Seed,

  /// Remove everything the model has learned.
  Clear,

  /// Print row counts of the model.
  Stats,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.debug { LevelFilter::DEBUG } else { LevelFilter::INFO };
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  let model_cfg = load_config(&cli)?;

  tracing::debug!(path = %model_cfg.storage_path, "opening store");
  let model = markov_store_sqlite::open_model(&model_cfg)
    .await
    .with_context(|| format!("failed to open store at {:?}", model_cfg.storage_path))?;
  let model = Arc::new(model);

  let result = run(cli.command, &model).await;

  // Close the store even when the command failed.
  match Arc::into_inner(model) {
    Some(model) => model.close().await.context("failed to close store")?,
    None => tracing::warn!("store still shared at shutdown; not closed explicitly"),
  }

  result
}

async fn run(
  command: Command,
  model: &Arc<markov_core::Model<markov_store_sqlite::SqliteStore>>,
) -> anyhow::Result<()> {
  match command {
    Command::Import { files, format } => {
      let mut tasks = JoinSet::new();
      for path in files {
        let model = Arc::clone(model);
        tasks.spawn(async move {
          let result = import::import_file(&*model, &path, format).await;
          (path, result)
        });
      }

      let mut count = 0;
      while let Some(joined) = tasks.join_next().await {
        let (path, result) = joined.context("import task panicked")?;
        match result {
          Ok(n) => {
            tracing::info!(file = %path.display(), texts = n, "imported");
            count += n;
          }
          Err(e) => tracing::error!(file = %path.display(), "{e:#}"),
        }
      }
      tracing::info!("Imported {count} texts");
    }

    Command::Generate { words, len } => {
      let seed = if words.is_empty() {
        model.seed().await.context("failed to pick a seed")?
      } else {
        words.join(" ")
      };
      tracing::info!("Using as seed {seed:?}");

      let text = model.generate(&seed, len).await.context("generation failed")?;
      println!("{text}");
    }

    Command::Seed => {
      println!("{}", model.seed().await.context("failed to pick a seed")?);
    }

    Command::Clear => {
      tracing::info!("Clearing the model");
      model.clear().await.context("failed to clear the model")?;
    }

    Command::Stats => {
      let stats = model.stats().await?;
      println!("prefixes:     {}", stats.prefixes);
      println!("transitions:  {}", stats.transitions);
      println!("chain starts: {}", stats.chain_starts);
    }
  }

  Ok(())
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// File, then environment, then command-line flags.
fn load_config(cli: &Cli) -> anyhow::Result<ModelConfig> {
  let settings = config::Config::builder()
    .set_default("storage_path", DEFAULT_STORAGE_PATH)?
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("MARKOV").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let mut model_cfg: ModelConfig = settings
    .try_deserialize()
    .context("failed to deserialise model configuration")?;

  if let Some(db) = &cli.db {
    model_cfg.storage_path = db.clone();
  }
  if let Some(prefix_len) = cli.prefix_len {
    model_cfg.params.prefix_len = prefix_len;
  }
  if cli.dry_run {
    model_cfg.params.dry_run = true;
  }

  if !model_cfg.is_in_memory() {
    model_cfg.storage_path = expand_tilde(Path::new(&model_cfg.storage_path))
      .to_string_lossy()
      .into_owned();
  }

  Ok(model_cfg)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
