// src/lib.rs - Main library file for Cuckoo Cycle proof-of-work verification
// Tree location: ./src/lib.rs

//! cuckoo-pow - Cuckoo Cycle proof-of-work verification
//!
//! Decides whether a submitted set of edge indices forms a valid fixed-length
//! cycle in the pseudorandom graph derived from a block header. Five variants
//! are supported (Cuckaroo, Cuckatoo, Cuckarood, Cuckaroom, Cuckarooz), all
//! built on one SipHash-2-4 primitive, and the right one is picked from the
//! chain type, block height and graph size.
//!
//! ```no_run
//! use cuckoo_pow::consensus::ChainType;
//! use cuckoo_pow::pow::{verify_size, BlockHeaderPow};
//!
//! # fn check(pre_pow: &[u8], header: &BlockHeaderPow) -> cuckoo_pow::Result<()> {
//! verify_size(ChainType::Mainnet, pre_pow, header)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod algorithms;
pub mod config;
pub mod consensus;
pub mod pow;

// Re-export main types for convenience
pub use algorithms::selector::create_pow_context;
pub use algorithms::{Algorithm, PowContext, Verifier, VerifyError};
pub use config::{ConfigError, Settings};
pub use consensus::{ChainType, ConsensusError, Difficulty};
pub use pow::{verify_size, BlockHeaderPow, Proof, ProofOfWork};

use hex::FromHexError;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Main error type for cuckoo-pow
#[derive(Error, Debug)]
pub enum CuckooPowError {
    /// The proof was examined and rejected
    #[error("Proof rejected: {0}")]
    Verify(#[from] VerifyError),

    /// No verifier could be built for the request
    #[error("Consensus error: {0}")]
    Consensus(#[from] ConsensusError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO operation errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed hex input
    #[error("Hex decode error: {0}")]
    Hex(#[from] FromHexError),

    /// Invalid command-line input
    #[error("Invalid input: {0}")]
    Input(String),

    /// Logging could not be set up
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type alias for cuckoo-pow operations
pub type Result<T> = std::result::Result<T, CuckooPowError>;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize logging with `RUST_LOG`, falling back to "info"
pub fn init() -> Result<()> {
    init_with_filter("info")
}

/// Initialize logging with `RUST_LOG`, falling back to `default_filter`
pub fn init_with_filter(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| CuckooPowError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| CuckooPowError::Logging(e.to_string()))?;

    tracing::debug!("{} v{} - {}", NAME, VERSION, DESCRIPTION);
    Ok(())
}
