// src/consensus/mod.rs - Chain types, PoW constants and the hard-fork schedule
// Tree location: ./src/consensus/mod.rs

//! Consensus parameters read by the PoW verifiers
//!
//! Only the values needed to pick and parameterise a verifier live here:
//! chain types, proof sizes, edge bits, graph weights and the hard-fork
//! schedule that maps a block height to a header version.

pub mod difficulty;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use difficulty::Difficulty;

/// Block interval in seconds the network tunes its target for
pub const BLOCK_TIME_SEC: u64 = 60;
/// Nominal height for one hour (60 blocks)
pub const HOUR_HEIGHT: u64 = 3600 / BLOCK_TIME_SEC;
/// Nominal height for one day (1 440 blocks)
pub const DAY_HEIGHT: u64 = 24 * HOUR_HEIGHT;
/// Nominal height for one week (10 080 blocks)
pub const WEEK_HEIGHT: u64 = 7 * DAY_HEIGHT;
/// Nominal height for one year (524 160 blocks)
pub const YEAR_HEIGHT: u64 = 52 * WEEK_HEIGHT;

/// Cuckoo-cycle proof size (cycle length)
pub const PROOF_SIZE: usize = 42;
/// Default Cuckatoo edge bits, used for mining and validating
pub const DEFAULT_MIN_EDGE_BITS: u8 = 31;
/// Edge bits of the secondary (ASIC resistant) proof of work
pub const SECOND_POW_EDGE_BITS: u8 = 29;
/// Reference edge bits for graph weight factors; changing this is a hard fork
pub const BASE_EDGE_BITS: u8 = 24;
/// Above this many edge bits the primary algorithm (Cuckatoo) always applies
pub const MAX_SECONDARY_EDGE_BITS: u8 = 29;

/// Scheduled hard forks every six months
pub const HARD_FORK_INTERVAL: u64 = YEAR_HEIGHT / 2;
/// Floonet first hard fork height
pub const FLOONET_FIRST_HARD_FORK: u64 = 185_040;
/// Floonet second hard fork height
pub const FLOONET_SECOND_HARD_FORK: u64 = 298_080;
/// Floonet third hard fork height, back on the regular interval
pub const FLOONET_THIRD_HARD_FORK: u64 = 3 * HARD_FORK_INTERVAL;
/// Floonet fourth hard fork height
pub const FLOONET_FOURTH_HARD_FORK: u64 = 4 * HARD_FORK_INTERVAL;

/// Automated testing edge bits
pub const AUTOMATED_TESTING_MIN_EDGE_BITS: u8 = 9;
/// Automated testing proof size
pub const AUTOMATED_TESTING_PROOF_SIZE: usize = 4;
/// User testing edge bits
pub const USER_TESTING_MIN_EDGE_BITS: u8 = 15;
/// User testing proof size
pub const USER_TESTING_PROOF_SIZE: usize = 42;

/// Dampening factor for difficulty adjustment
pub const DIFFICULTY_DAMP_FACTOR: u64 = 3;
/// Minimum difficulty, enforced in retargeting
pub const MIN_DIFFICULTY: u64 = DIFFICULTY_DAMP_FACTOR;
/// Unit difficulty, the graph weight of the secondary PoW
pub const UNIT_DIFFICULTY: u64 =
    (2u64 << (SECOND_POW_EDGE_BITS - BASE_EDGE_BITS)) * SECOND_POW_EDGE_BITS as u64;
/// Initial difficulty at launch
pub const INITIAL_DIFFICULTY: u64 = 1_000_000 * UNIT_DIFFICULTY;
/// Initial graph weight on test chains
pub const TESTING_INITIAL_GRAPH_WEIGHT: u32 = 1;

/// Errors raised while building a verifier, before any proof is looked at
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    /// The header version at this height has no Cuckoo variant
    #[error("unsupported header version {version} at height {height}")]
    UnsupportedHeaderVersion {
        /// Header version computed from the fork schedule
        version: u16,
        /// Block height
        height: u64,
    },

    /// Cycle length beyond what the verifiers support
    #[error("proof size {proof_size} exceeds maximum {max}")]
    ProofSizeTooLarge {
        /// Requested proof size
        proof_size: usize,
        /// Supported maximum
        max: usize,
    },

    /// Graph size out of range
    #[error("invalid edge bits: {0}")]
    InvalidEdgeBits(u8),

    /// Unknown chain type name
    #[error("unknown chain type: {0}")]
    UnknownChainType(String),
}

/// Type of chain a node runs with; dictates mining parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainType {
    /// CI testing
    AutomatedTesting,
    /// User testing
    UserTesting,
    /// Protocol testing network
    Floonet,
    /// Main production network
    Mainnet,
}

impl ChainType {
    /// All chain types, in declaration order
    pub const ALL: [ChainType; 4] = [
        ChainType::AutomatedTesting,
        ChainType::UserTesting,
        ChainType::Floonet,
        ChainType::Mainnet,
    ];

    /// Short name ("auto", "user", "floo", "main")
    pub fn shortname(&self) -> &'static str {
        match self {
            ChainType::AutomatedTesting => "auto",
            ChainType::UserTesting => "user",
            ChainType::Floonet => "floo",
            ChainType::Mainnet => "main",
        }
    }

    /// Live public network (floonet or mainnet)
    pub fn is_production(&self) -> bool {
        matches!(self, ChainType::Floonet | ChainType::Mainnet)
    }

    /// Required cycle length on this chain
    pub fn proof_size(&self) -> usize {
        match self {
            ChainType::AutomatedTesting => AUTOMATED_TESTING_PROOF_SIZE,
            ChainType::UserTesting => USER_TESTING_PROOF_SIZE,
            _ => PROOF_SIZE,
        }
    }

    /// Minimum acceptable edge bits
    pub fn min_edge_bits(&self) -> u8 {
        match self {
            ChainType::AutomatedTesting => AUTOMATED_TESTING_MIN_EDGE_BITS,
            ChainType::UserTesting => USER_TESTING_MIN_EDGE_BITS,
            _ => DEFAULT_MIN_EDGE_BITS,
        }
    }

    /// Reference edge bits for graph weight factors
    pub fn base_edge_bits(&self) -> u8 {
        match self {
            ChainType::AutomatedTesting => AUTOMATED_TESTING_MIN_EDGE_BITS,
            ChainType::UserTesting => USER_TESTING_MIN_EDGE_BITS,
            _ => BASE_EDGE_BITS,
        }
    }

    /// Built-in hard-fork schedule
    pub fn default_fork_schedule(&self) -> ForkSchedule {
        match self {
            ChainType::Mainnet => ForkSchedule::every(HARD_FORK_INTERVAL, 4),
            ChainType::Floonet => ForkSchedule::new(vec![
                FLOONET_FIRST_HARD_FORK,
                FLOONET_SECOND_HARD_FORK,
                FLOONET_THIRD_HARD_FORK,
                FLOONET_FOURTH_HARD_FORK,
            ]),
            _ => ForkSchedule::default(),
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shortname())
    }
}

impl FromStr for ChainType {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" | "automated_testing" => Ok(ChainType::AutomatedTesting),
            "user" | "user_testing" => Ok(ChainType::UserTesting),
            "floo" | "floonet" | "testnet" => Ok(ChainType::Floonet),
            "main" | "mainnet" => Ok(ChainType::Mainnet),
            other => Err(ConsensusError::UnknownChainType(other.to_string())),
        }
    }
}

/// Ascending hard-fork heights of a chain.
///
/// The header version at a height is one plus the number of forks at or
/// below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForkSchedule {
    heights: Vec<u64>,
}

impl ForkSchedule {
    /// Schedule from explicit fork heights (expected ascending)
    pub fn new(heights: Vec<u64>) -> Self {
        Self { heights }
    }

    /// `count` forks spaced every `interval` blocks
    pub fn every(interval: u64, count: u64) -> Self {
        Self::new((1..=count).map(|n| n * interval).collect())
    }

    /// Fork heights
    pub fn heights(&self) -> &[u64] {
        &self.heights
    }

    /// Whether heights are strictly increasing
    pub fn is_ascending(&self) -> bool {
        self.heights.windows(2).all(|w| w[0] < w[1])
    }

    /// Header version at a given height
    pub fn header_version(&self, height: u64) -> u16 {
        let forks = self.heights.iter().take_while(|&&h| h <= height).count();
        1 + forks as u16
    }

    /// Whether `version` is the header version expected at `height`
    pub fn valid_header_version(&self, height: u64, version: u16) -> bool {
        version == self.header_version(height)
    }
}

/// Header version at a height with the chain's built-in schedule
pub fn header_version(chain_type: ChainType, height: u64) -> u16 {
    chain_type.default_fork_schedule().header_version(height)
}

/// Whether the block version is valid at a given height
pub fn valid_header_version(chain_type: ChainType, height: u64, version: u16) -> bool {
    chain_type
        .default_fork_schedule()
        .valid_header_version(height, version)
}

/// Weight of a graph as the number of siphash bits defining it.
///
/// Cuckatoo31 is phased out from one year in, losing one factor per week.
pub fn graph_weight(chain_type: ChainType, height: u64, edge_bits: u8) -> u64 {
    let mut xpr_edge_bits = edge_bits as u64;
    if edge_bits == 31 && height >= YEAR_HEIGHT {
        xpr_edge_bits = xpr_edge_bits.saturating_sub(1 + (height - YEAR_HEIGHT) / WEEK_HEIGHT);
    }
    let shift = edge_bits.saturating_sub(chain_type.base_edge_bits()) as u32;
    2u64.checked_shl(shift).unwrap_or(0).saturating_mul(xpr_edge_bits)
}

/// Share of blocks the secondary PoW should take, out of 100.
/// Starts at 90 and loses a point roughly every week.
pub fn secondary_pow_ratio(height: u64) -> u64 {
    90u64.saturating_sub(height / (2 * YEAR_HEIGHT / 90))
}

/// Initial secondary scaling factor
pub fn initial_graph_weight(chain_type: ChainType) -> u32 {
    if chain_type.is_production() {
        graph_weight(chain_type, 0, SECOND_POW_EDGE_BITS) as u32
    } else {
        TESTING_INITIAL_GRAPH_WEIGHT
    }
}

/// Initial mining difficulty
pub fn initial_block_difficulty(chain_type: ChainType) -> u64 {
    if chain_type.is_production() {
        INITIAL_DIFFICULTY
    } else {
        1
    }
}
