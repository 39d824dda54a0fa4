// src/algorithms/cuckatoo.rs - Cuckatoo cycle verifier
// Tree location: ./src/algorithms/cuckatoo.rs

//! Cuckatoo verifier
//!
//! The primary (ASIC friendly) proof of work. Each endpoint is its own plain
//! siphash of `2 * nonce + side`, so no block hashing is involved. Nodes are
//! compared with their lowest bit dropped, which pairs every node with its
//! neighbour on the opposite parity.

use super::params::{CuckooParams, MAX_PROOF_SIZE};
use super::{check_nonce, check_proof_size, follow_cycle, Algorithm, PowContext, VerifyError};
use crate::consensus::{ChainType, ConsensusError};
use crate::pow::Proof;

/// Cuckatoo verification context
#[derive(Debug, Clone)]
pub struct CuckatooContext {
    chain_type: ChainType,
    params: CuckooParams,
    max_sols: u32,
}

impl CuckatooContext {
    /// Create a context for `2^edge_bits` edges and cycles of `proof_size`
    pub fn new(
        chain_type: ChainType,
        edge_bits: u8,
        proof_size: usize,
        max_sols: u32,
    ) -> Result<Self, ConsensusError> {
        Ok(Self {
            chain_type,
            params: CuckooParams::new(edge_bits, edge_bits, proof_size)?,
            max_sols,
        })
    }

    /// Solution cap a solver would use with this context
    pub fn max_sols(&self) -> u32 {
        self.max_sols
    }

    fn sipnode(&self, edge: u64, uorv: u64) -> u64 {
        self.params.sipnode(edge, uorv, false)
    }
}

impl PowContext for CuckatooContext {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Cuckatoo
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
        let mut xor0 = (size as u64 / 2) & 1;
        let mut xor1 = xor0;

        for n in 0..size {
            check_nonce(nonces, n, self.params.edge_mask)?;
            uvs[2 * n] = self.sipnode(nonces[n], 0);
            uvs[2 * n + 1] = self.sipnode(nonces[n], 1);
            xor0 ^= uvs[2 * n];
            xor1 ^= uvs[2 * n + 1];
        }
        if xor0 | xor1 != 0 {
            return Err(VerifyError::EndpointsDontMatchUp);
        }

        walk_cycle(&uvs[..2 * size])
    }
}

/// Follow the cycle through `uvs`. Partner nodes differ only in their
/// lowest bit; an identical node is a dead end.
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
            if uvs[k] >> 1 == uvs[i] >> 1 {
                if j != i {
                    return Err(VerifyError::BranchInCycle);
                }
                j = k;
            }
        }
        if j == i || uvs[j] == uvs[i] {
            return Err(VerifyError::CycleDeadEnds);
        }
        Ok(j)
    })
}
