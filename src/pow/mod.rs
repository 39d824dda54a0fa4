// src/pow/mod.rs - Proofs, header proof of work and the block verification entry point
// Tree location: ./src/pow/mod.rs

//! Proof of work types
//!
//! A [`Proof`] is the cycle a miner found: the graph size and the ascending
//! edge indices. [`ProofOfWork`] is what a block header carries around it, and
//! [`verify_size`] checks one against its header.

pub mod request;

use std::fmt;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algorithms::selector::create_pow_context_with_schedule;
use crate::algorithms::PowContext;
use crate::consensus::{
    graph_weight, ChainType, Difficulty, ForkSchedule, DEFAULT_MIN_EDGE_BITS,
    SECOND_POW_EDGE_BITS,
};
use crate::Result;

pub use request::{parse_nonces, VerifyRequest};

/// Solution cap handed to Cuckatoo contexts built for verification
pub const MAX_SOLS: u32 = 10;

type Blake2b256 = Blake2b<U32>;

/// A Cuckoo Cycle proof of work: graph size and the cycle's edge indices.
///
/// The hash of a proof is the hash of its nonces packed at exactly
/// `edge_bits` bits each.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proof {
    /// log2 of the number of edges in the graph
    pub edge_bits: u8,
    /// Edge indices of the cycle, ascending
    pub nonces: Vec<u64>,
}

impl Proof {
    /// Proof at the default primary graph size. Nonces are taken as given,
    /// without sorting.
    pub fn new(nonces: Vec<u64>) -> Self {
        Self {
            edge_bits: DEFAULT_MIN_EDGE_BITS,
            nonces,
        }
    }

    /// Proof with an explicit graph size
    pub fn with_edge_bits(edge_bits: u8, nonces: Vec<u64>) -> Self {
        Self { edge_bits, nonces }
    }

    /// Proof of `proof_size` zero nonces; never valid
    pub fn zero(proof_size: usize) -> Self {
        Self::new(vec![0; proof_size])
    }

    /// Number of nonces
    pub fn proof_size(&self) -> usize {
        self.nonces.len()
    }

    /// Nonces serialized at `edge_bits` bits each, least significant bit
    /// first, padded to a whole byte.
    pub fn pack_nonces(&self) -> Vec<u8> {
        let nonce_bits = self.edge_bits as usize;
        let mut packed = vec![0u8; (nonce_bits * self.nonces.len() + 7) / 8];
        for (n, nonce) in self.nonces.iter().enumerate() {
            for bit in 0..nonce_bits.min(64) {
                if (nonce >> bit) & 1 == 1 {
                    let pos = n * nonce_bits + bit;
                    packed[pos / 8] |= 1 << (pos % 8);
                }
            }
        }
        packed
    }

    /// BLAKE2b-256 of the packed nonces
    pub fn hash(&self) -> [u8; 32] {
        let digest = Blake2b256::digest(self.pack_nonces());
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        hash
    }

    /// Difficulty achieved by this proof with a given scaling factor
    pub fn scaled_difficulty(&self, scale: u64) -> u64 {
        let hash = self.hash();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash[..8]);
        let hash_u64 = u64::from_be_bytes(head).max(1);
        let diff = ((scale as u128) << 64) / hash_u64 as u128;
        diff.min(u64::MAX as u128) as u64
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cuckoo{}(", self.edge_bits)?;
        for (i, nonce) in self.nonces.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:x}", nonce)?;
        }
        f.write_str(")")
    }
}

/// Proof-of-work data carried by a block header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOfWork {
    /// Total accumulated difficulty since genesis
    pub total_difficulty: Difficulty,
    /// Difficulty scaling factor of the secondary proof of work
    pub secondary_scaling: u32,
    /// Nonce increment used to mine this block
    pub nonce: u64,
    /// The cycle itself
    pub proof: Proof,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self {
            total_difficulty: Difficulty::min_dma(),
            secondary_scaling: 1,
            nonce: 0,
            proof: Proof::zero(0),
        }
    }
}

impl ProofOfWork {
    /// Graph size of the proof
    pub fn edge_bits(&self) -> u8 {
        self.proof.edge_bits
    }

    /// Whether this is a primary (Cuckatoo) proof
    pub fn is_primary(&self) -> bool {
        self.proof.edge_bits != SECOND_POW_EDGE_BITS
            && self.proof.edge_bits >= DEFAULT_MIN_EDGE_BITS
    }

    /// Whether this is a secondary (29 edge bits) proof
    pub fn is_secondary(&self) -> bool {
        self.proof.edge_bits == SECOND_POW_EDGE_BITS
    }

    /// Difficulty achieved by the proof. Primary proofs are scaled by their
    /// graph weight, secondary ones by the header's scaling factor.
    pub fn to_difficulty(&self, chain_type: ChainType, height: u64) -> Difficulty {
        let scale = if self.is_primary() {
            graph_weight(chain_type, height, self.edge_bits())
        } else {
            self.secondary_scaling as u64
        };
        Difficulty::from_num(self.proof.scaled_difficulty(scale))
    }
}

/// The parts of a block header that proof verification looks at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeaderPow {
    /// Block height
    pub height: u64,
    /// Proof of work
    pub pow: ProofOfWork,
}

/// Verify a header's proof against its pre-PoW bytes
pub fn verify_size(chain_type: ChainType, pre_pow: &[u8], header: &BlockHeaderPow) -> Result<()> {
    verify_size_with_schedule(
        chain_type,
        &chain_type.default_fork_schedule(),
        pre_pow,
        header,
    )
}

/// Verify a header's proof under an explicit fork schedule.
///
/// The verifier is built for the chain's proof size; a proof with any other
/// number of nonces fails with [`VerifyError::WrongCycleLength`].
///
/// [`VerifyError::WrongCycleLength`]: crate::algorithms::VerifyError::WrongCycleLength
pub fn verify_size_with_schedule(
    chain_type: ChainType,
    schedule: &ForkSchedule,
    pre_pow: &[u8],
    header: &BlockHeaderPow,
) -> Result<()> {
    let pow = &header.pow;
    // sized by the chain, so a bad nonce count is a rejection
    let mut ctx = create_pow_context_with_schedule(
        chain_type,
        schedule,
        header.height,
        pow.edge_bits(),
        chain_type.proof_size(),
        MAX_SOLS,
    )?;
    ctx.set_header_nonce(pre_pow, None);
    ctx.verify(&pow.proof)?;
    debug!(
        height = header.height,
        algorithm = %ctx.algorithm(),
        "verified {}",
        pow.proof
    );
    Ok(())
}
