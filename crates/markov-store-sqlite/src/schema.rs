//! SQL schema for the Markov SQLite store.
//!
//! Executed on every open. The window length is not recorded: a store must
//! always be opened with the prefix length it was trained with.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per distinct window of tokens, joined by single spaces.
CREATE TABLE IF NOT EXISTS prefixes (
    prefix_id INTEGER PRIMARY KEY,
    prefix    TEXT NOT NULL UNIQUE
);

-- A multiset: each row is one observation of `token` following the prefix.
-- Never deduplicated; row multiplicity is the transition weight.
CREATE TABLE IF NOT EXISTS transitions (
    prefix_id INTEGER NOT NULL REFERENCES prefixes(prefix_id),
    token     TEXT NOT NULL
);

-- Prefixes that opened some ingested text.
CREATE TABLE IF NOT EXISTS chain_starts (
    prefix TEXT NOT NULL UNIQUE
);

CREATE INDEX IF NOT EXISTS transitions_prefix_idx ON transitions(prefix_id);
";
