// src/config/settings.rs - Verifier settings loaded from JSON
// Tree location: ./src/config/settings.rs

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ConfigError;
use crate::consensus::{ChainType, ForkSchedule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Main configuration settings for the verifier
pub struct Settings {
    /// Chain whose rules apply when none is given on the command line
    pub chain_type: ChainType,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Number of proofs verified concurrently by the batch command
    pub batch_workers: usize,
    /// Replacement mainnet hard-fork heights
    pub mainnet_fork_heights: Option<ForkSchedule>,
    /// Replacement floonet hard-fork heights
    pub floonet_fork_heights: Option<ForkSchedule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chain_type: ChainType::Mainnet,
            log_filter: "info".to_string(),
            batch_workers: 4,
            mainnet_fork_heights: None,
            floonet_fork_heights: None,
        }
    }
}

impl Settings {
    /// Read and validate settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&raw)?;
        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Pretty-printed JSON form
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the fork overrides and worker count
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (chain_type, schedule) in [
            (ChainType::Mainnet, &self.mainnet_fork_heights),
            (ChainType::Floonet, &self.floonet_fork_heights),
        ] {
            if let Some(schedule) = schedule {
                if !schedule.is_ascending() {
                    return Err(ConfigError::ForksNotAscending(chain_type));
                }
            }
        }
        if self.batch_workers == 0 {
            return Err(ConfigError::NoBatchWorkers);
        }
        Ok(())
    }

    /// Fork schedule in force for a chain, honouring overrides
    pub fn fork_schedule(&self, chain_type: ChainType) -> ForkSchedule {
        let overridden = match chain_type {
            ChainType::Mainnet => self.mainnet_fork_heights.as_ref(),
            ChainType::Floonet => self.floonet_fork_heights.as_ref(),
            _ => None,
        };
        overridden
            .cloned()
            .unwrap_or_else(|| chain_type.default_fork_schedule())
    }
}
