// src/algorithms/cuckarooz.rs - Cuckarooz cycle verifier
// Tree location: ./src/algorithms/cuckarooz.rs

//! Cuckarooz verifier
//!
//! Undirected, non-bipartite graph: both endpoints live in one node set of
//! `edge_bits + 1` bits, so the cycle scan considers every slot rather than
//! only those on the same side.

use super::params::{CuckooParams, MAX_EDGE_BITS, MAX_PROOF_SIZE};
use super::siphash::siphash_block;
use super::{check_nonce, check_proof_size, follow_cycle, Algorithm, PowContext, VerifyError};
use crate::consensus::{ChainType, ConsensusError};
use crate::pow::Proof;

/// Cuckarooz verification context
#[derive(Debug, Clone)]
pub struct CuckaroozContext {
    chain_type: ChainType,
    params: CuckooParams,
}

impl CuckaroozContext {
    /// Create a context for `2^edge_bits` edges and cycles of `proof_size`
    pub fn new(
        chain_type: ChainType,
        edge_bits: u8,
        proof_size: usize,
    ) -> Result<Self, ConsensusError> {
        if edge_bits == 0 || edge_bits > MAX_EDGE_BITS {
            return Err(ConsensusError::InvalidEdgeBits(edge_bits));
        }
        Ok(Self {
            chain_type,
            params: CuckooParams::new(edge_bits, edge_bits + 1, proof_size)?,
        })
    }
}

impl PowContext for CuckaroozContext {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Cuckarooz
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
        let node_mask = self.params.node_mask;
        let mut uvs = [0u64; 2 * MAX_PROOF_SIZE];
        let mut xoruv = 0u64;
        let rotation = self.algorithm().rotation();

        for n in 0..size {
            check_nonce(nonces, n, self.params.edge_mask)?;
            let edge = siphash_block(&self.params.siphash_keys, nonces[n], rotation, true);
            uvs[2 * n] = edge & node_mask;
            uvs[2 * n + 1] = (edge >> 32) & node_mask;
            xoruv ^= uvs[2 * n] ^ uvs[2 * n + 1];
        }
        if xoruv != 0 {
            return Err(VerifyError::EndpointsDontMatchUp);
        }

        walk_cycle(&uvs[..2 * size])
    }
}

/// Follow the cycle through `uvs`; any other slot may share a node
fn walk_cycle(uvs: &[u64]) -> Result<(), VerifyError> {
    let ring = uvs.len();
    follow_cycle(ring / 2, |i| {
        let mut j = i;
        let mut k = i;
        loop {
            k = (k + 1) % ring;
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
