// src/algorithms/cuckaroom.rs - Cuckaroom cycle verifier
// Tree location: ./src/algorithms/cuckaroom.rs

//! Cuckaroom verifier
//!
//! Directed variant where every edge goes from one node to another in a single
//! node set of `edge_bits - 1` bits. The cycle is walked edge to edge: the next
//! edge is the first one whose source equals the current edge's target.

use super::params::{CuckooParams, MAX_PROOF_SIZE};
use super::siphash::siphash_block;
use super::{check_nonce, check_proof_size, Algorithm, PowContext, VerifyError};
use crate::consensus::{ChainType, ConsensusError};
use crate::pow::Proof;

/// Cuckaroom verification context
#[derive(Debug, Clone)]
pub struct CuckaroomContext {
    chain_type: ChainType,
    params: CuckooParams,
}

impl CuckaroomContext {
    /// Create a context for `2^edge_bits` edges and cycles of `proof_size`
    pub fn new(
        chain_type: ChainType,
        edge_bits: u8,
        proof_size: usize,
    ) -> Result<Self, ConsensusError> {
        if edge_bits < 2 {
            return Err(ConsensusError::InvalidEdgeBits(edge_bits));
        }
        Ok(Self {
            chain_type,
            params: CuckooParams::new(edge_bits, edge_bits - 1, proof_size)?,
        })
    }
}

impl PowContext for CuckaroomContext {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Cuckaroom
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
        let mut from = [0u64; MAX_PROOF_SIZE];
        let mut to = [0u64; MAX_PROOF_SIZE];
        let mut xor_from = 0u64;
        let mut xor_to = 0u64;
        let rotation = self.algorithm().rotation();

        for n in 0..size {
            check_nonce(nonces, n, self.params.edge_mask)?;
            let edge = siphash_block(&self.params.siphash_keys, nonces[n], rotation, true);
            from[n] = edge & node_mask;
            to[n] = (edge >> 32) & node_mask;
            xor_from ^= from[n];
            xor_to ^= to[n];
        }
        if xor_from != xor_to {
            return Err(VerifyError::EndpointsDontMatchUp);
        }

        walk_edges(&from[..size], &to[..size])
    }
}

/// Follow directed edges from edge 0: the next edge is the first one leaving
/// the node the current one enters.
fn walk_edges(from: &[u64], to: &[u64]) -> Result<(), VerifyError> {
    let size = from.len();
    let mut visited = [false; MAX_PROOF_SIZE];
    let mut n = 0;
    let mut i = 0;
    loop {
        if visited[i] {
            return Err(VerifyError::BranchInCycle);
        }
        visited[i] = true;

        let target = to[i];
        i = from
            .iter()
            .position(|&source| source == target)
            .ok_or(VerifyError::CycleDeadEnds)?;
        n += 1;
        if i == 0 {
            break;
        }
    }

    if n == size {
        Ok(())
    } else {
        Err(VerifyError::CycleTooShort)
    }
}
