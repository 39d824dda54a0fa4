//! Difficulty, defined as the maximum target divided by the block hash.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use super::{initial_graph_weight, ChainType, MIN_DIFFICULTY};

/// Block difficulty; never below 1 when built from a raw number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty {
    num: u64,
}

impl Difficulty {
    /// Difficulty of zero, which is invalid but useful as an accumulator
    pub fn zero() -> Self {
        Self { num: 0 }
    }

    /// Difficulty of `MIN_DIFFICULTY`
    pub fn min_dma() -> Self {
        Self { num: MIN_DIFFICULTY }
    }

    /// Difficulty unit: the graph weight of the minimal graph
    pub fn unit(chain_type: ChainType) -> Self {
        Self {
            num: initial_graph_weight(chain_type) as u64,
        }
    }

    /// Convert a `u64` into a difficulty, clamping to at least 1
    pub fn from_num(num: u64) -> Self {
        Self { num: num.max(1) }
    }

    /// Raw difficulty value
    pub fn to_num(self) -> u64 {
        self.num
    }
}

impl Add for Difficulty {
    type Output = Difficulty;

    fn add(self, other: Difficulty) -> Difficulty {
        Difficulty {
            num: self.num.saturating_add(other.num),
        }
    }
}

impl Sub for Difficulty {
    type Output = Difficulty;

    fn sub(self, other: Difficulty) -> Difficulty {
        Difficulty {
            num: self.num.saturating_sub(other.num),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_num_clamps_to_one() {
        assert_eq!(Difficulty::from_num(0).to_num(), 1);
        assert_eq!(Difficulty::from_num(1).to_num(), 1);
        assert_eq!(Difficulty::from_num(12345).to_num(), 12345);
        assert_eq!(Difficulty::zero().to_num(), 0);
    }

    #[test]
    fn test_unit_and_min() {
        assert_eq!(Difficulty::unit(ChainType::Mainnet).to_num(), 1856);
        assert_eq!(Difficulty::unit(ChainType::UserTesting).to_num(), 1);
        assert_eq!(Difficulty::min_dma().to_num(), 3);
    }

    #[test]
    fn test_saturating_arithmetic() {
        let max = Difficulty::from_num(u64::MAX);
        assert_eq!((max + Difficulty::from_num(5)).to_num(), u64::MAX);
        assert_eq!((Difficulty::from_num(2) - Difficulty::from_num(5)).to_num(), 0);
        assert_eq!((Difficulty::from_num(7) - Difficulty::from_num(5)).to_num(), 2);
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Difficulty::from_num(42)).unwrap();
        assert_eq!(json, "42");
        let back: Difficulty = serde_json::from_str("0").unwrap();
        assert_eq!(back, Difficulty::zero());
    }
}
