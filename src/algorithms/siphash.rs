// src/algorithms/siphash.rs - SipHash-2-4 primitives shared by every Cuckoo variant
// Tree location: ./src/algorithms/siphash.rs

//! SipHash-2-4 implementation for the Cuckoo Cycle family
//!
//! Every edge of a Cuckoo graph is derived from a keyed SipHash-2-4 of the
//! edge index. The four key words come straight from the header digest (see
//! [`super::params::CuckooParams`]); no SipHash initialisation constants are
//! mixed in, and the last rotation of each round is a parameter because
//! Cuckarood uses 25 instead of the usual 21.
//!
//! Two entry points are provided:
//! - [`siphash24`]: a single hash of one nonce
//! - [`siphash_block`]: the hash at a nonce's position inside a block of 64
//!   consecutive hashes, XORed with later hashes of the block so that a
//!   verifier cannot skip computing the block

/// Number of bits in a SipHash block index
pub const SIPHASH_BLOCK_BITS: u64 = 6;
/// Number of hashes in one block (64)
pub const SIPHASH_BLOCK_SIZE: u64 = 1 << SIPHASH_BLOCK_BITS;
/// Mask selecting a nonce's position within its block
pub const SIPHASH_BLOCK_MASK: u64 = SIPHASH_BLOCK_SIZE - 1;

/// Standard final rotation used by Cuckaroo, Cuckatoo, Cuckaroom and Cuckarooz
pub const DEFAULT_ROTATION: u8 = 21;
/// Final rotation used by Cuckarood
pub const CUCKAROOD_ROTATION: u8 = 25;

/// SipHash-2-4 state keyed directly with four 64-bit words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SipHash24 {
    v0: u64,
    v1: u64,
    v2: u64,
    v3: u64,
}

impl SipHash24 {
    /// Create a new state from the four siphash keys
    pub fn new(keys: &[u64; 4]) -> Self {
        Self {
            v0: keys[0],
            v1: keys[1],
            v2: keys[2],
            v3: keys[3],
        }
    }

    /// Absorb one nonce: 2 compression rounds, then 4 finalization rounds.
    ///
    /// State carries over between calls, which is what [`siphash_block`]
    /// relies on.
    pub fn hash(&mut self, nonce: u64, rot_e: u8) {
        self.v3 ^= nonce;
        self.round(rot_e);
        self.round(rot_e);

        self.v0 ^= nonce;
        self.v2 ^= 0xff;

        for _ in 0..4 {
            self.round(rot_e);
        }
    }

    /// Current digest of the state
    pub fn digest(&self) -> u64 {
        (self.v0 ^ self.v1) ^ (self.v2 ^ self.v3)
    }

    /// Single SipRound. The rotation amounts 13, 16, 32, 17 and 32 are fixed;
    /// `rot_e` replaces the usual 21.
    #[inline]
    fn round(&mut self, rot_e: u8) {
        self.v0 = self.v0.wrapping_add(self.v1);
        self.v2 = self.v2.wrapping_add(self.v3);
        self.v1 = self.v1.rotate_left(13);
        self.v3 = self.v3.rotate_left(16);
        self.v1 ^= self.v0;
        self.v3 ^= self.v2;
        self.v0 = self.v0.rotate_left(32);
        self.v2 = self.v2.wrapping_add(self.v1);
        self.v0 = self.v0.wrapping_add(self.v3);
        self.v1 = self.v1.rotate_left(17);
        self.v3 = self.v3.rotate_left(rot_e as u32);
        self.v1 ^= self.v2;
        self.v3 ^= self.v0;
        self.v2 = self.v2.rotate_left(32);
    }
}

/// Compute a single SipHash-2-4 of `nonce` under `keys`
#[inline]
pub fn siphash24(keys: &[u64; 4], nonce: u64, rot_e: u8) -> u64 {
    let mut hasher = SipHash24::new(keys);
    hasher.hash(nonce, rot_e);
    hasher.digest()
}

/// Hash a whole block of 64 nonces and return the value at `nonce`'s position.
///
/// The hash at position `i` is XORed with every later hash of the block when
/// `xor_all` is set (or when `i` is the last position), otherwise only with
/// the last hash of the block.
pub fn siphash_block(keys: &[u64; 4], nonce: u64, rot_e: u8, xor_all: bool) -> u64 {
    let nonce0 = nonce & !SIPHASH_BLOCK_MASK;
    let nonce_i = (nonce & SIPHASH_BLOCK_MASK) as usize;
    let mut nonce_hash = [0u64; SIPHASH_BLOCK_SIZE as usize];

    let mut hasher = SipHash24::new(keys);
    for (i, slot) in nonce_hash.iter_mut().enumerate() {
        hasher.hash(nonce0 + i as u64, rot_e);
        *slot = hasher.digest();
    }

    let last = SIPHASH_BLOCK_MASK as usize;
    let xor_from = if xor_all || nonce_i == last {
        nonce_i + 1
    } else {
        last
    };

    nonce_hash[xor_from..]
        .iter()
        .fold(nonce_hash[nonce_i], |acc, h| acc ^ h)
}
