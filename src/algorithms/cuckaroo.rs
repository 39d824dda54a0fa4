// src/algorithms/cuckaroo.rs - Cuckaroo cycle verifier
// Tree location: ./src/algorithms/cuckaroo.rs

//! Cuckaroo verifier
//!
//! Bipartite graph whose edge endpoints are the low and high 32-bit halves of
//! one block siphash, both masked to `edge_bits`. The cycle is followed by
//! jumping between endpoints that share a node on the same side.

use super::params::{CuckooParams, MAX_PROOF_SIZE};
use super::siphash::siphash_block;
use super::{check_nonce, check_proof_size, follow_cycle, Algorithm, PowContext, VerifyError};
use crate::consensus::{ChainType, ConsensusError};
use crate::pow::Proof;

/// Cuckaroo verification context
#[derive(Debug, Clone)]
pub struct CuckarooContext {
    chain_type: ChainType,
    params: CuckooParams,
}

impl CuckarooContext {
    /// Create a context for `2^edge_bits` edges and cycles of `proof_size`
    pub fn new(
        chain_type: ChainType,
        edge_bits: u8,
        proof_size: usize,
    ) -> Result<Self, ConsensusError> {
        Ok(Self {
            chain_type,
            params: CuckooParams::new(edge_bits, edge_bits, proof_size)?,
        })
    }
}

impl PowContext for CuckarooContext {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Cuckaroo
    }

    fn params(&self) -> &CuckooParams {
        &self.params
    }

    fn set_header_nonce(&mut self, header: &[u8], nonce: Option<u32>) {
        self.params.reset_header_nonce(header, nonce);
    }

    fn set_siphash_keys(&mut self, keys: [u64; 4]) {
        self.params.siphash_keys = keys;
    }

    fn verify(&self, proof: &Proof) -> Result<(), VerifyError> {
        let size = check_proof_size(self.chain_type, &self.params, proof)?;
        let nonces = &proof.nonces;
        let mut uvs = [0u64; 2 * MAX_PROOF_SIZE];
        let mut xor0 = 0u64;
        let mut xor1 = 0u64;
        let rotation = self.algorithm().rotation();

        for n in 0..size {
            check_nonce(nonces, n, self.params.edge_mask)?;
            let edge = siphash_block(&self.params.siphash_keys, nonces[n], rotation, false);
            uvs[2 * n] = edge & self.params.edge_mask;
            uvs[2 * n + 1] = (edge >> 32) & self.params.edge_mask;
            xor0 ^= uvs[2 * n];
            xor1 ^= uvs[2 * n + 1];
        }
        if xor0 | xor1 != 0 {
            return Err(VerifyError::EndpointsDontMatchUp);
        }

        walk_cycle(&uvs[..2 * size])
    }
}

/// Follow the cycle through `uvs`, matching nodes on the same side
fn walk_cycle(uvs: &[u64]) -> Result<(), VerifyError> {
    let ring = uvs.len();
    follow_cycle(ring / 2, |i| {
        let mut j = i;
        let mut k = i;
        loop {
            k = (k + 2) % ring;
            if k == i {
                break;
            }
            if uvs[k] == uvs[i] {
                if j != i {
                    return Err(VerifyError::BranchInCycle);
                }
                j = k;
            }
        }
        if j == i {
            return Err(VerifyError::CycleDeadEnds);
        }
        Ok(j)
    })
}
