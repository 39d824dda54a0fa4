// src/config/mod.rs - Configuration module
// Tree location: ./src/config/mod.rs

//! Configuration for the verifier and its command-line front end

pub mod settings;

use thiserror::Error;

use crate::consensus::ChainType;

pub use settings::Settings;

/// Errors raised while loading or validating settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        /// File path
        path: String,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Settings are not valid JSON for [`Settings`]
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A fork override is not strictly ascending
    #[error("{0} fork heights must be strictly ascending")]
    ForksNotAscending(ChainType),

    /// Batch verification needs at least one worker
    #[error("batch_workers must be at least 1")]
    NoBatchWorkers,
}
