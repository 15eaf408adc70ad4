//! [`SqliteStore`] — the SQLite implementation of [`ChainStore`].

use std::path::Path;

use rand::Rng as _;
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use markov_core::{ChainStore, ModelStats, PrefixId};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Markov chain store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn to_count(column: &'static str, value: i64) -> Result<u64> {
  u64::try_from(value).map_err(|_| Error::Corrupt { column, value })
}

// ─── ChainStore impl ─────────────────────────────────────────────────────────

impl ChainStore for SqliteStore {
  type Error = Error;

  async fn ensure_schema(&self) -> Result<()> {
    self.init_schema().await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn lookup_or_create_prefix(&self, text: String, create: bool) -> Result<Option<PrefixId>> {
    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        // IMMEDIATE takes the write lock before the read, so no other
        // writer can slip an insert of the same text in between.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<i64> = tx
          .query_row(
            "SELECT prefix_id FROM prefixes WHERE prefix = ?1",
            rusqlite::params![text],
            |r| r.get(0),
          )
          .optional()?;

        let id = match existing {
          Some(id) => Some(id),
          None if create => {
            tx.execute(
              "INSERT INTO prefixes (prefix) VALUES (?1)",
              rusqlite::params![text],
            )?;
            Some(tx.last_insert_rowid())
          }
          None => None,
        };

        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(id.map(PrefixId))
  }

  async fn append_transition(&self, prefix_id: PrefixId, token: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO transitions (prefix_id, token) VALUES (?1, ?2)",
          rusqlite::params![prefix_id.0, token],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn append_chain_start(&self, text: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO chain_starts (prefix) VALUES (?1)",
          rusqlite::params![text],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn clear_all(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM chain_starts", [])?;
        // Transitions reference prefixes, so they are deleted before them.
        tx.execute("DELETE FROM transitions", [])?;
        tx.execute("DELETE FROM prefixes", [])?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn successors_of(&self, prefix: String) -> Result<Vec<String>> {
    let tokens = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT t.token
           FROM transitions t
           JOIN prefixes p ON p.prefix_id = t.prefix_id
           WHERE p.prefix = ?1
           ORDER BY t.rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![prefix], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(tokens)
  }

  async fn random_chain_start(&self) -> Result<Option<String>> {
    // Count-then-offset: uniform even when rowids have gaps.
    let start = self
      .conn
      .call(|conn| {
        let count: i64 =
          conn.query_row("SELECT COUNT(*) FROM chain_starts", [], |r| r.get(0))?;
        if count <= 0 {
          return Ok(None);
        }

        let offset = rand::rng().random_range(0..count);
        let prefix = conn
          .query_row(
            "SELECT prefix FROM chain_starts ORDER BY rowid LIMIT 1 OFFSET ?1",
            rusqlite::params![offset],
            |r| r.get(0),
          )
          .optional()?;
        Ok(prefix)
      })
      .await?;
    Ok(start)
  }

  async fn stats(&self) -> Result<ModelStats> {
    let (prefixes, transitions, chain_starts): (i64, i64, i64) = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT
             (SELECT COUNT(*) FROM prefixes),
             (SELECT COUNT(*) FROM transitions),
             (SELECT COUNT(*) FROM chain_starts)",
          [],
          |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )?)
      })
      .await?;

    Ok(ModelStats {
      prefixes:     to_count("prefixes", prefixes)?,
      transitions:  to_count("transitions", transitions)?,
      chain_starts: to_count("chain_starts", chain_starts)?,
    })
  }

  async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}
