// src/algorithms/params.rs - Graph parameters and siphash key derivation
// Tree location: ./src/algorithms/params.rs

//! Graph parameters shared by the Cuckoo verifiers
//!
//! The siphash keys are the BLAKE2b-256 digest of the pre-PoW header, with the
//! optional 32-bit mining nonce written over its last four bytes.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

use super::siphash::{siphash24, DEFAULT_ROTATION};
use crate::consensus::ConsensusError;

/// Largest cycle length the verifiers' stack buffers can hold
pub const MAX_PROOF_SIZE: usize = 64;

/// Largest supported graph size (edges are indexed by u64)
pub const MAX_EDGE_BITS: u8 = 63;

type Blake2b256 = Blake2b<U32>;

/// Cuckoo graph parameters for one verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuckooParams {
    /// log2 of the number of edges
    pub edge_bits: u8,
    /// Required cycle length
    pub proof_size: usize,
    /// Number of edges (2^edge_bits)
    pub num_edges: u64,
    /// Keys for the edge siphash, zero until a header is set
    pub siphash_keys: [u64; 4],
    /// Mask folding a value into an edge index
    pub edge_mask: u64,
    /// Mask folding a hash into a node index
    pub node_mask: u64,
}

impl CuckooParams {
    /// Build parameters for a graph of `2^edge_bits` edges whose nodes are
    /// `node_bits` wide.
    pub fn new(edge_bits: u8, node_bits: u8, proof_size: usize) -> Result<Self, ConsensusError> {
        if edge_bits == 0 || edge_bits > MAX_EDGE_BITS {
            return Err(ConsensusError::InvalidEdgeBits(edge_bits));
        }
        if node_bits == 0 || node_bits > 64 {
            return Err(ConsensusError::InvalidEdgeBits(edge_bits));
        }
        if proof_size > MAX_PROOF_SIZE {
            return Err(ConsensusError::ProofSizeTooLarge {
                proof_size,
                max: MAX_PROOF_SIZE,
            });
        }

        let num_edges = 1u64 << edge_bits;
        let node_mask = if node_bits == 64 {
            u64::MAX
        } else {
            (1u64 << node_bits) - 1
        };

        Ok(Self {
            edge_bits,
            proof_size,
            num_edges,
            siphash_keys: [0; 4],
            edge_mask: num_edges - 1,
            node_mask,
        })
    }

    /// Reset the siphash keys from a header and optional nonce
    pub fn reset_header_nonce(&mut self, header: &[u8], nonce: Option<u32>) {
        self.siphash_keys = set_header_nonce(header, nonce);
    }

    /// Siphash of an edge endpoint masked to an edge index.
    ///
    /// With `shift`, the result is moved up one bit and tagged with `uorv` so
    /// that U and V nodes land on even and odd values.
    pub fn sipnode(&self, edge: u64, uorv: u64, shift: bool) -> u64 {
        let hash = siphash24(
            &self.siphash_keys,
            edge.wrapping_mul(2).wrapping_add(uorv),
            DEFAULT_ROTATION,
        );
        let mut masked = hash & self.edge_mask;
        if shift {
            masked <<= 1;
            masked |= uorv;
        }
        masked
    }
}

/// Derive siphash keys from a header, writing `nonce` little-endian over the
/// header's last four bytes when present.
pub fn set_header_nonce(header: &[u8], nonce: Option<u32>) -> [u64; 4] {
    match nonce {
        Some(nonce) => {
            let keep = header.len().saturating_sub(4);
            let mut buf = Vec::with_capacity(keep + 4);
            buf.extend_from_slice(&header[..keep]);
            buf.extend_from_slice(&nonce.to_le_bytes());
            create_siphash_keys(&buf)
        }
        None => create_siphash_keys(header),
    }
}

/// Split the BLAKE2b-256 digest of `header` into four little-endian words
pub fn create_siphash_keys(header: &[u8]) -> [u64; 4] {
    let digest = Blake2b256::digest(header);
    let mut keys = [0u64; 4];
    for (key, chunk) in keys.iter_mut().zip(digest.chunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *key = u64::from_le_bytes(word);
    }
    keys
}
