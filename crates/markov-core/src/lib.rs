//! Core types and operations for the persistent Markov chain model.
//!
//! This crate is free of database dependencies. Storage backends (e.g.
//! `markov-store-sqlite`) implement [`ChainStore`]; everything above them
//! talks to a [`Model`].

pub mod config;
pub mod error;
pub mod generate;
pub mod model;
pub mod prefix;
pub mod store;
pub mod train;

pub use config::{ModelConfig, Parameters};
pub use error::{Error, Result};
pub use model::{Model, TrainSummary, WriteAccess};
pub use prefix::PrefixId;
pub use store::{ChainStore, ModelStats};

#[cfg(test)]
mod testing;
