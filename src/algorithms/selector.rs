// src/algorithms/selector.rs - Pick the verifier for a chain, height and graph size
// Tree location: ./src/algorithms/selector.rs

//! Variant selection
//!
//! Graphs above 29 edge bits are always Cuckatoo. Smaller graphs on the
//! production chains use the secondary variant of the header version in force
//! at the block height; test chains stick to Cuckatoo.

use tracing::trace;

use super::{
    Algorithm, CuckarooContext, CuckaroodContext, CuckaroomContext, CuckaroozContext,
    CuckatooContext, Verifier,
};
use crate::consensus::{ChainType, ConsensusError, ForkSchedule, MAX_SECONDARY_EDGE_BITS};

/// Which variant applies, using the chain's built-in fork schedule
pub fn select_algorithm(
    chain_type: ChainType,
    height: u64,
    edge_bits: u8,
) -> Result<Algorithm, ConsensusError> {
    select_algorithm_with_schedule(
        chain_type,
        &chain_type.default_fork_schedule(),
        height,
        edge_bits,
    )
}

/// Which variant applies under an explicit fork schedule
pub fn select_algorithm_with_schedule(
    chain_type: ChainType,
    schedule: &ForkSchedule,
    height: u64,
    edge_bits: u8,
) -> Result<Algorithm, ConsensusError> {
    if edge_bits > MAX_SECONDARY_EDGE_BITS || !chain_type.is_production() {
        return Ok(Algorithm::Cuckatoo);
    }
    let version = schedule.header_version(height);
    Algorithm::for_header_version(version)
        .ok_or(ConsensusError::UnsupportedHeaderVersion { version, height })
}

/// Build the verifier for a block, using the chain's built-in fork schedule
pub fn create_pow_context(
    chain_type: ChainType,
    height: u64,
    edge_bits: u8,
    proof_size: usize,
    max_sols: u32,
) -> Result<Verifier, ConsensusError> {
    create_pow_context_with_schedule(
        chain_type,
        &chain_type.default_fork_schedule(),
        height,
        edge_bits,
        proof_size,
        max_sols,
    )
}

/// Build the verifier for a block under an explicit fork schedule
pub fn create_pow_context_with_schedule(
    chain_type: ChainType,
    schedule: &ForkSchedule,
    height: u64,
    edge_bits: u8,
    proof_size: usize,
    max_sols: u32,
) -> Result<Verifier, ConsensusError> {
    let algorithm = select_algorithm_with_schedule(chain_type, schedule, height, edge_bits)?;
    trace!(
        chain = %chain_type,
        height,
        edge_bits,
        "selected {}",
        algorithm
    );

    let verifier = match algorithm {
        Algorithm::Cuckaroo => {
            Verifier::Cuckaroo(CuckarooContext::new(chain_type, edge_bits, proof_size)?)
        }
        Algorithm::Cuckatoo => Verifier::Cuckatoo(CuckatooContext::new(
            chain_type, edge_bits, proof_size, max_sols,
        )?),
        Algorithm::Cuckarood => {
            Verifier::Cuckarood(CuckaroodContext::new(chain_type, edge_bits, proof_size)?)
        }
        Algorithm::Cuckaroom => {
            Verifier::Cuckaroom(CuckaroomContext::new(chain_type, edge_bits, proof_size)?)
        }
        Algorithm::Cuckarooz => {
            Verifier::Cuckarooz(CuckaroozContext::new(chain_type, edge_bits, proof_size)?)
        }
    };
    Ok(verifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::PowContext;
    use crate::consensus::{
        FLOONET_FIRST_HARD_FORK, FLOONET_FOURTH_HARD_FORK, FLOONET_SECOND_HARD_FORK,
        FLOONET_THIRD_HARD_FORK, YEAR_HEIGHT,
    };

    const MAX_SOLS: u32 = 10;

    fn algo(chain_type: ChainType, height: u64, edge_bits: u8) -> Algorithm {
        create_pow_context(chain_type, height, edge_bits, 42, MAX_SOLS)
            .unwrap()
            .algorithm()
    }

    #[test]
    fn test_mainnet_context() {
        let first = YEAR_HEIGHT / 2;
        let cases = [
            (first - 1, Algorithm::Cuckaroo),
            (first, Algorithm::Cuckarood),
            (first + 1, Algorithm::Cuckarood),
            (YEAR_HEIGHT - 1, Algorithm::Cuckarood),
            (YEAR_HEIGHT, Algorithm::Cuckaroom),
            (YEAR_HEIGHT + 1, Algorithm::Cuckaroom),
            (3 * first - 1, Algorithm::Cuckaroom),
            (3 * first, Algorithm::Cuckarooz),
            (4 * first - 1, Algorithm::Cuckarooz),
        ];
        for (height, expected) in cases {
            assert_eq!(algo(ChainType::Mainnet, height, 29), expected, "height {}", height);
            assert_eq!(algo(ChainType::Mainnet, height, 31), Algorithm::Cuckatoo);
        }
    }

    #[test]
    fn test_floonet_context() {
        let cases = [
            (FLOONET_FIRST_HARD_FORK - 1, Algorithm::Cuckaroo),
            (FLOONET_FIRST_HARD_FORK, Algorithm::Cuckarood),
            (FLOONET_FIRST_HARD_FORK + 1, Algorithm::Cuckarood),
            (FLOONET_SECOND_HARD_FORK - 1, Algorithm::Cuckarood),
            (FLOONET_SECOND_HARD_FORK, Algorithm::Cuckaroom),
            (FLOONET_SECOND_HARD_FORK + 1, Algorithm::Cuckaroom),
            (FLOONET_THIRD_HARD_FORK, Algorithm::Cuckarooz),
            (FLOONET_FOURTH_HARD_FORK - 1, Algorithm::Cuckarooz),
        ];
        for (height, expected) in cases {
            assert_eq!(algo(ChainType::Floonet, height, 29), expected, "height {}", height);
            assert_eq!(algo(ChainType::Floonet, height, 31), Algorithm::Cuckatoo);
        }
    }

    #[test]
    fn test_after_last_fork_secondary_is_unsupported() {
        let err = create_pow_context(ChainType::Mainnet, YEAR_HEIGHT * 2, 29, 42, MAX_SOLS)
            .unwrap_err();
        assert_eq!(
            err,
            ConsensusError::UnsupportedHeaderVersion {
                version: 5,
                height: YEAR_HEIGHT * 2
            }
        );
        // primary PoW is unaffected
        assert_eq!(algo(ChainType::Mainnet, YEAR_HEIGHT * 2, 32), Algorithm::Cuckatoo);
    }

    #[test]
    fn test_testing_chains_use_cuckatoo() {
        for chain in [ChainType::AutomatedTesting, ChainType::UserTesting] {
            for edge_bits in [9, 15, 29, 31] {
                assert_eq!(algo(chain, 0, edge_bits), Algorithm::Cuckatoo);
                assert_eq!(algo(chain, YEAR_HEIGHT * 10, edge_bits), Algorithm::Cuckatoo);
            }
        }
    }

    #[test]
    fn test_custom_schedule() {
        let schedule = ForkSchedule::new(vec![10, 20]);
        let pick = |height| {
            select_algorithm_with_schedule(ChainType::Mainnet, &schedule, height, 29).unwrap()
        };
        assert_eq!(pick(9), Algorithm::Cuckaroo);
        assert_eq!(pick(10), Algorithm::Cuckarood);
        assert_eq!(pick(25), Algorithm::Cuckaroom);
    }

    #[test]
    fn test_construction_errors_propagate() {
        assert_eq!(
            create_pow_context(ChainType::Mainnet, 0, 31, 65, MAX_SOLS).unwrap_err(),
            ConsensusError::ProofSizeTooLarge {
                proof_size: 65,
                max: 64
            }
        );
        assert_eq!(
            create_pow_context(ChainType::Mainnet, 0, 64, 42, MAX_SOLS).unwrap_err(),
            ConsensusError::InvalidEdgeBits(64)
        );
    }

    #[test]
    fn test_context_graph_shape() {
        let ctx = create_pow_context(ChainType::Mainnet, YEAR_HEIGHT / 2, 29, 42, MAX_SOLS).unwrap();
        assert_eq!(ctx.params().edge_bits, 29);
        assert_eq!(ctx.params().node_mask, (1 << 28) - 1);
        assert_eq!(ctx.params().proof_size, 42);
    }
}
