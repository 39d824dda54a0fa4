// src/pow/request.rs - Self-contained verification requests
// Tree location: ./src/pow/request.rs

//! One proof to check, with everything needed to rebuild its verifier.
//! This is the unit the command line works with, both for single proofs and
//! for JSON batches.

use serde::{Deserialize, Serialize};

use super::{Proof, MAX_SOLS};
use crate::algorithms::selector::create_pow_context_with_schedule;
use crate::algorithms::{Algorithm, PowContext};
use crate::config::Settings;
use crate::consensus::ChainType;
use crate::Result;

/// A proof and the header data it was mined on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// Chain rules to apply; the configured chain when absent
    #[serde(default)]
    pub chain_type: Option<ChainType>,
    /// Block height
    #[serde(default)]
    pub height: u64,
    /// Graph size of the proof
    pub edge_bits: u8,
    /// Pre-PoW header bytes, hex encoded
    pub pre_pow: String,
    /// Mining nonce written over the header tail, if not already included
    #[serde(default)]
    pub nonce: Option<u32>,
    /// Cycle edge indices
    pub nonces: Vec<u64>,
}

impl VerifyRequest {
    /// The proof carried by this request
    pub fn proof(&self) -> Proof {
        Proof::with_edge_bits(self.edge_bits, self.nonces.clone())
    }

    /// Build the verifier for this request, seed it and check the proof.
    /// Returns the variant that accepted it.
    pub fn verify(&self, settings: &Settings) -> Result<Algorithm> {
        let chain_type = self.chain_type.unwrap_or(settings.chain_type);
        let pre_pow = hex::decode(self.pre_pow.trim_start_matches("0x"))?;
        let proof = self.proof();

        let mut ctx = create_pow_context_with_schedule(
            chain_type,
            &settings.fork_schedule(chain_type),
            self.height,
            self.edge_bits,
            chain_type.proof_size(),
            MAX_SOLS,
        )?;
        ctx.set_header_nonce(&pre_pow, self.nonce);
        ctx.verify(&proof)?;
        Ok(ctx.algorithm())
    }
}

/// Parse a comma separated nonce list. Entries prefixed with `0x` are hex.
pub fn parse_nonces(list: &str) -> Result<Vec<u64>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let parsed = match s.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse(),
            };
            parsed.map_err(|e| crate::CuckooPowError::Input(format!("bad nonce '{}': {}", s, e)))
        })
        .collect()
}
