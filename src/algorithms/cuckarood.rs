// src/algorithms/cuckarood.rs - Cuckarood cycle verifier
// Tree location: ./src/algorithms/cuckarood.rs

//! Cuckarood verifier
//!
//! Directed variant: the lowest nonce bit picks the edge direction and a valid
//! cycle alternates directions, so exactly half the nonces are even. Nodes are
//! one bit narrower than edges and edge hashing uses rotation 25.

use super::params::{CuckooParams, MAX_PROOF_SIZE};
use super::siphash::siphash_block;
use super::{check_nonce, check_proof_size, follow_cycle, Algorithm, PowContext, VerifyError};
use crate::consensus::{ChainType, ConsensusError};
use crate::pow::Proof;

/// Cuckarood verification context
#[derive(Debug, Clone)]
pub struct CuckaroodContext {
    chain_type: ChainType,
    params: CuckooParams,
}

impl CuckaroodContext {
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

impl PowContext for CuckaroodContext {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Cuckarood
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
        let mut ndir = [0usize; 2];
        let mut xor0 = 0u64;
        let mut xor1 = 0u64;
        let rotation = self.algorithm().rotation();

        for n in 0..size {
            let dir = (nonces[n] & 1) as usize;
            if ndir[dir] >= size / 2 {
                return Err(VerifyError::EdgesNotBalanced);
            }
            check_nonce(nonces, n, self.params.edge_mask)?;
            let edge = siphash_block(&self.params.siphash_keys, nonces[n], rotation, false);
            // slots 4m, 4m+1 hold forward edges, 4m+2, 4m+3 backward ones
            let idx = 4 * ndir[dir] + 2 * dir;
            uvs[idx] = edge & node_mask;
            uvs[idx + 1] = (edge >> 32) & node_mask;
            xor0 ^= uvs[idx];
            xor1 ^= uvs[idx + 1];
            ndir[dir] += 1;
        }
        if xor0 | xor1 != 0 {
            return Err(VerifyError::EndpointsDontMatchUp);
        }

        walk_cycle(&uvs[..2 * size])
    }
}

/// Follow the cycle through `uvs`, always onto an edge of the opposite
/// direction. Slot `i % 4` says which side and direction `i` holds.
fn walk_cycle(uvs: &[u64]) -> Result<(), VerifyError> {
    let ring = uvs.len();
    follow_cycle(ring / 2, |i| {
        let mut j = i;
        let mut k = (i % 4) ^ 2;
        while k < ring {
            if uvs[k] == uvs[i] {
                if j != i {
                    return Err(VerifyError::BranchInCycle);
                }
                j = k;
            }
            k += 4;
        }
        if j == i {
            return Err(VerifyError::CycleDeadEnds);
        }
        Ok(j)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1_19_HASH: [u64; 4] = [
        0x89f81d7da5e674df,
        0x7586b93105a5fd13,
        0x6fbe212dd4e8c001,
        0x8800c93a8431f938,
    ];
    const V1_19_SOL: [u64; 42] = [
        0xa00, 0x3ffb, 0xa474, 0xdc27, 0x182e6, 0x242cc, 0x24de4, 0x270a2, 0x28356, 0x2951f,
        0x2a6ae, 0x2c889, 0x355c7, 0x3863b, 0x3bd7e, 0x3cdbc, 0x3ff95, 0x430b6, 0x4ba1a, 0x4bd7e,
        0x4c59f, 0x4f76d, 0x52064, 0x5378c, 0x540a3, 0x5af6b, 0x5b041, 0x5e9d3, 0x64ec7, 0x6564b,
        0x66763, 0x66899, 0x66e80, 0x68e4e, 0x69133, 0x6b20a, 0x6c2d7, 0x6fd3b, 0x79a8a, 0x79e29,
        0x7ae52, 0x7defe,
    ];

    const V2_29_HASH: [u64; 4] = [
        0xe2f917b2d79492ed,
        0xf51088eaaa3a07a0,
        0xaf4d4288d36a4fa8,
        0xc8cdfd30a54e0581,
    ];
    const V2_29_SOL: [u64; 42] = [
        0x1a9629, 0x1fb257, 0x5dc22a, 0xf3d0b0, 0x200c474, 0x24bd68f, 0x48ad104, 0x4a17170,
        0x4ca9a41, 0x55f983f, 0x6076c91, 0x6256ffc, 0x63b60a1, 0x7fd5b16, 0x985bff8, 0xaae71f3,
        0xb71f7b4, 0xb989679, 0xc09b7b8, 0xd7601da, 0xd7ab1b6, 0xef1c727, 0xf1e702b, 0xfd6d961,
        0xfdf0007, 0x10248134, 0x114657f6, 0x11f52612, 0x12887251, 0x13596b4b, 0x15e8d831,
        0x16b4c9e5, 0x17097420, 0x1718afca, 0x187fc40c, 0x19359788, 0x1b41d3f1, 0x1bea25a7,
        0x1d28df0f, 0x1ea6c4a0, 0x1f9bf79f, 0x1fa005c6,
    ];

    fn context(edge_bits: u8, keys: [u64; 4]) -> CuckaroodContext {
        let mut ctx = CuckaroodContext::new(ChainType::Mainnet, edge_bits, 42).unwrap();
        ctx.set_siphash_keys(keys);
        ctx
    }

    #[test]
    fn test_cuckarood19_vectors() {
        let ctx = context(19, V1_19_HASH);
        assert_eq!(ctx.verify(&Proof::new(V1_19_SOL.to_vec())), Ok(()));
        assert!(ctx.verify(&Proof::zero(42)).is_err());
    }

    #[test]
    fn test_cuckarood29_vectors() {
        let ctx = context(29, V2_29_HASH);
        assert_eq!(ctx.verify(&Proof::new(V2_29_SOL.to_vec())), Ok(()));
        assert!(ctx.verify(&Proof::zero(42)).is_err());
    }

    #[test]
    fn test_node_mask_is_one_bit_narrower() {
        let ctx = context(29, V2_29_HASH);
        assert_eq!(ctx.params().node_mask, ctx.params().edge_mask >> 1);
    }

    #[test]
    fn test_unbalanced_directions() {
        // 22 even nonces: the 22nd forward edge overflows its half
        let ctx = context(19, V1_19_HASH);
        let nonces: Vec<u64> = (0..42).map(|n| n * 2).collect();
        assert_eq!(
            ctx.verify(&Proof::new(nonces)),
            Err(VerifyError::EdgesNotBalanced)
        );
    }

    #[test]
    fn test_balance_checked_before_bounds() {
        let ctx = context(19, V1_19_HASH);
        let mut nonces: Vec<u64> = (0..42).map(|n| n * 2).collect();
        nonces[21] = u64::MAX - 1;
        assert_eq!(
            ctx.verify(&Proof::new(nonces)),
            Err(VerifyError::EdgesNotBalanced)
        );
    }

    #[test]
    fn test_other_keys_reject() {
        let ctx = context(19, V2_29_HASH);
        assert_eq!(
            ctx.verify(&Proof::new(V1_19_SOL.to_vec())),
            Err(VerifyError::EndpointsDontMatchUp)
        );
    }

    #[test]
    fn test_moved_edge_breaks_endpoints() {
        // same direction, so balance still holds
        let ctx = context(19, V1_19_HASH);
        let mut nonces = V1_19_SOL.to_vec();
        nonces[41] = 0x7df00;
        assert_eq!(
            ctx.verify(&Proof::new(nonces)),
            Err(VerifyError::EndpointsDontMatchUp)
        );
    }

    // Synthetic endpoints: slots 4m, 4m+1 are forward edge m, slots
    // 4m+2, 4m+3 backward edge m.

    #[test]
    fn test_walk_four_cycle() {
        assert_eq!(walk_cycle(&[1, 4, 1, 2, 3, 2, 3, 4]), Ok(()));
    }

    #[test]
    fn test_walk_two_short_cycles() {
        assert_eq!(
            walk_cycle(&[1, 2, 1, 2, 5, 6, 5, 6]),
            Err(VerifyError::CycleTooShort)
        );
    }

    #[test]
    fn test_walk_node_on_three_edges() {
        assert_eq!(
            walk_cycle(&[1, 9, 1, 8, 7, 6, 1, 5]),
            Err(VerifyError::BranchInCycle)
        );
    }

    #[test]
    fn test_walk_unmatched_node() {
        assert_eq!(
            walk_cycle(&[1, 2, 3, 4, 5, 6, 7, 8]),
            Err(VerifyError::CycleDeadEnds)
        );
    }

    #[test]
    fn test_walk_loop_skipping_first_edge() {
        // backward slots 3 and 7 both lead to slot 5, so after the first
        // edge the walk keeps returning to slot 4 and never to slot 0
        assert_eq!(
            walk_cycle(&[1, 9, 1, 2, 3, 2, 3, 2]),
            Err(VerifyError::BranchInCycle)
        );
    }
}
