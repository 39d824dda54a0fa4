// src/algorithms/mod.rs - Unified algorithms module for the Cuckoo verifiers
// Tree location: ./src/algorithms/mod.rs

//! Algorithms module
//!
//! Provides unified access to the five Cuckoo Cycle verifiers. Every variant
//! implements [`PowContext`]; [`Verifier`] wraps them so that callers can hold
//! whichever one [`selector::create_pow_context`] picked without boxing.
//!
//! | Variant   | Graph      | Edge hash                  | Rotation |
//! |-----------|------------|----------------------------|----------|
//! | Cuckaroo  | bipartite  | siphash block              | 21       |
//! | Cuckatoo  | bipartite  | plain siphash per endpoint | 21       |
//! | Cuckarood | directed   | siphash block              | 25       |
//! | Cuckaroom | directed   | siphash block, xor all     | 21       |
//! | Cuckarooz | monopartite| siphash block, xor all     | 21       |

pub mod cuckaroo;
pub mod cuckarood;
pub mod cuckaroom;
pub mod cuckarooz;
pub mod cuckatoo;
pub mod params;
pub mod selector;
pub mod siphash;

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::consensus::ChainType;
use crate::pow::Proof;

pub use cuckaroo::CuckarooContext;
pub use cuckarood::CuckaroodContext;
pub use cuckaroom::CuckaroomContext;
pub use cuckarooz::CuckaroozContext;
pub use cuckatoo::CuckatooContext;
pub use params::{CuckooParams, MAX_PROOF_SIZE};

/// Supported Cuckoo Cycle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// ASIC-resistant variant used before the first hard fork
    Cuckaroo,
    /// ASIC-friendly primary proof of work
    Cuckatoo,
    /// Directed variant after the first hard fork
    Cuckarood,
    /// Directed variant with full block xor after the second hard fork
    Cuckaroom,
    /// Single node set variant after the third hard fork
    Cuckarooz,
}

impl Algorithm {
    /// All variants
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Cuckaroo,
        Algorithm::Cuckatoo,
        Algorithm::Cuckarood,
        Algorithm::Cuckaroom,
        Algorithm::Cuckarooz,
    ];

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Cuckaroo => "Cuckaroo",
            Algorithm::Cuckatoo => "Cuckatoo",
            Algorithm::Cuckarood => "Cuckarood",
            Algorithm::Cuckaroom => "Cuckaroom",
            Algorithm::Cuckarooz => "Cuckarooz",
        }
    }

    /// Final siphash rotation used for edge generation
    pub fn rotation(&self) -> u8 {
        match self {
            Algorithm::Cuckarood => siphash::CUCKAROOD_ROTATION,
            _ => siphash::DEFAULT_ROTATION,
        }
    }

    /// Whether edges carry a direction
    pub fn is_directed(&self) -> bool {
        matches!(self, Algorithm::Cuckarood | Algorithm::Cuckaroom)
    }

    /// Secondary (ASIC resistant) variant for a header version, if any
    pub fn for_header_version(version: u16) -> Option<Self> {
        match version {
            1 => Some(Algorithm::Cuckaroo),
            2 => Some(Algorithm::Cuckarood),
            3 => Some(Algorithm::Cuckaroom),
            4 => Some(Algorithm::Cuckarooz),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reasons a claimed cycle is rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// Nonce count differs from the chain's proof size
    #[error("wrong cycle length")]
    WrongCycleLength,

    /// A nonce is outside the graph
    #[error("edge too big")]
    EdgeTooBig,

    /// Nonces are not strictly increasing
    #[error("edges not ascending")]
    EdgesNotAscending,

    /// Directed edges are not split evenly between both directions
    #[error("edges not balanced")]
    EdgesNotBalanced,

    /// Endpoint xor invariant violated
    #[error("endpoints don't match up")]
    EndpointsDontMatchUp,

    /// An endpoint is shared by more than two edges
    #[error("branch in cycle")]
    BranchInCycle,

    /// No edge continues the cycle
    #[error("cycle dead ends")]
    CycleDeadEnds,

    /// Cycle closes before visiting every edge
    #[error("cycle too short")]
    CycleTooShort,
}

/// Common interface of the Cuckoo verifiers
pub trait PowContext {
    /// Variant implemented by this context
    fn algorithm(&self) -> Algorithm;

    /// Graph parameters in use
    fn params(&self) -> &CuckooParams;

    /// Derive the siphash keys from a pre-PoW header and optional nonce
    fn set_header_nonce(&mut self, header: &[u8], nonce: Option<u32>);

    /// Install siphash keys directly, e.g. from a reference vector
    fn set_siphash_keys(&mut self, keys: [u64; 4]);

    /// Verify a claimed cycle with the stored keys
    fn verify(&self, proof: &Proof) -> Result<(), VerifyError>;
}

/// One of the five verifiers, chosen by the selector
#[derive(Debug, Clone)]
pub enum Verifier {
    /// Cuckaroo verifier
    Cuckaroo(CuckarooContext),
    /// Cuckatoo verifier
    Cuckatoo(CuckatooContext),
    /// Cuckarood verifier
    Cuckarood(CuckaroodContext),
    /// Cuckaroom verifier
    Cuckaroom(CuckaroomContext),
    /// Cuckarooz verifier
    Cuckarooz(CuckaroozContext),
}

impl Verifier {
    fn inner(&self) -> &dyn PowContext {
        match self {
            Verifier::Cuckaroo(ctx) => ctx,
            Verifier::Cuckatoo(ctx) => ctx,
            Verifier::Cuckarood(ctx) => ctx,
            Verifier::Cuckaroom(ctx) => ctx,
            Verifier::Cuckarooz(ctx) => ctx,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn PowContext {
        match self {
            Verifier::Cuckaroo(ctx) => ctx,
            Verifier::Cuckatoo(ctx) => ctx,
            Verifier::Cuckarood(ctx) => ctx,
            Verifier::Cuckaroom(ctx) => ctx,
            Verifier::Cuckarooz(ctx) => ctx,
        }
    }
}

impl PowContext for Verifier {
    fn algorithm(&self) -> Algorithm {
        self.inner().algorithm()
    }

    fn params(&self) -> &CuckooParams {
        self.inner().params()
    }

    fn set_header_nonce(&mut self, header: &[u8], nonce: Option<u32>) {
        self.inner_mut().set_header_nonce(header, nonce);
    }

    fn set_siphash_keys(&mut self, keys: [u64; 4]) {
        self.inner_mut().set_siphash_keys(keys);
    }

    fn verify(&self, proof: &Proof) -> Result<(), VerifyError> {
        let result = self.inner().verify(proof);
        if let Err(e) = &result {
            debug!(
                algorithm = %self.algorithm(),
                edge_bits = self.params().edge_bits,
                "proof rejected: {}",
                e
            );
        }
        result
    }
}

/// Check the nonce count against both the chain and the graph parameters
pub(crate) fn check_proof_size(
    chain_type: ChainType,
    params: &CuckooParams,
    proof: &Proof,
) -> Result<usize, VerifyError> {
    let size = proof.proof_size();
    if size != chain_type.proof_size() || size != params.proof_size {
        return Err(VerifyError::WrongCycleLength);
    }
    Ok(size)
}

/// Bounds and ordering checks for the nonce at index `n`
#[inline]
pub(crate) fn check_nonce(nonces: &[u64], n: usize, edge_mask: u64) -> Result<(), VerifyError> {
    if nonces[n] > edge_mask {
        return Err(VerifyError::EdgeTooBig);
    }
    if n > 0 && nonces[n] <= nonces[n - 1] {
        return Err(VerifyError::EdgesNotAscending);
    }
    Ok(())
}

/// Walk a cycle over `2 * size` endpoint slots starting at slot 0.
///
/// `partner` returns the other slot sharing slot `i`'s node; the walk then
/// crosses that slot's edge (`^ 1`). A walk still open after `size` steps has
/// run into a loop that skips slot 0.
pub(crate) fn follow_cycle<F>(size: usize, mut partner: F) -> Result<(), VerifyError>
where
    F: FnMut(usize) -> Result<usize, VerifyError>,
{
    let mut n = 0;
    let mut i = 0;
    loop {
        i = partner(i)? ^ 1;
        n += 1;
        if i == 0 {
            break;
        }
        if n >= size {
            return Err(VerifyError::BranchInCycle);
        }
    }

    if n == size {
        Ok(())
    } else {
        Err(VerifyError::CycleTooShort)
    }
}
