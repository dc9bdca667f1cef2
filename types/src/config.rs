//! Engine configuration with TOML file support.
//!
//! Every tunable the election algorithm depends on lives here, so a test can
//! shrink the periods to single digits while the live deployment keeps the
//! production values. Defaults match the original mainnet deployment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::address::SourceAddress;

/// Error loading or parsing an [`ElectionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Io { path: PathBuf, reason: String },
    #[error("invalid config: {0}")]
    Parse(String),
}

/// Source-chain contract addresses the engine reads from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContracts {
    /// Token contract; transfer logs and balance queries.
    #[serde(default = "default_token_contract")]
    pub token: SourceAddress,

    /// Voting contract; delegation and vote-out logs.
    #[serde(default = "default_voting_contract")]
    pub voting: SourceAddress,

    /// Validators contract; the valid validator set per election.
    #[serde(default = "default_validators_contract")]
    pub validators: SourceAddress,

    /// Validators registry contract; source-to-target address translation.
    #[serde(default = "default_validators_registry_contract")]
    pub validators_registry: SourceAddress,

    /// Guardians contract; guardian membership checks.
    #[serde(default = "default_guardians_contract")]
    pub guardians: SourceAddress,
}

/// The engine's tunables.
///
/// Can be loaded from a TOML file via [`ElectionConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Block-denominated periods count
/// source-chain blocks; heights count target-chain blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Divisor scaling raw u128 token balances down to u64 stakes.
    #[serde(default = "default_stake_scaling_divisor")]
    pub stake_scaling_divisor: u128,

    /// Exact raw transfer value that declares a delegation-by-transfer.
    #[serde(default = "default_delegation_marker_amount")]
    pub delegation_marker_amount: u128,

    /// Blocks past the election block during which events may still be mirrored.
    #[serde(default = "default_mirror_period_blocks")]
    pub mirror_period_blocks: u64,

    /// How long a guardian's vote stays valid, in blocks before the election.
    #[serde(default = "default_vote_validity_blocks")]
    pub vote_validity_blocks: u64,

    /// Blocks between consecutive elections.
    #[serde(default = "default_election_period_blocks")]
    pub election_period_blocks: u64,

    /// Source-chain block of the first election.
    #[serde(default = "default_genesis_election_block")]
    pub genesis_election_block: u64,

    /// Maximum candidates a single vote-out event may name.
    #[serde(default = "default_max_candidates_per_vote")]
    pub max_candidates_per_vote: usize,

    /// Advertised validator-set capacity. Selection itself does not cap.
    #[serde(default = "default_max_elected_validators")]
    pub max_elected_validators: u32,

    /// Percentage of the total voting weight that votes a validator out.
    #[serde(default = "default_vote_out_percent")]
    pub vote_out_percent: u64,

    /// Target-chain heights between recording a result and it taking effect.
    #[serde(default = "default_transition_period_heights")]
    pub transition_period_heights: u64,

    /// Upper bound on nodes visited while resolving one guardian's delegation
    /// graph. Exceeding it fails the tally instead of looping.
    #[serde(default = "default_max_delegation_graph_size")]
    pub max_delegation_graph_size: usize,

    /// Source-chain contracts to read from.
    #[serde(default)]
    pub contracts: SourceContracts,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_stake_scaling_divisor() -> u128 {
    1_000_000_000_000_000_000 // 10^18 raw units per whole token
}

fn default_delegation_marker_amount() -> u128 {
    7
}

fn default_mirror_period_blocks() -> u64 {
    480
}

fn default_vote_validity_blocks() -> u64 {
    40_320
}

fn default_election_period_blocks() -> u64 {
    17_280
}

fn default_genesis_election_block() -> u64 {
    7_519_801
}

fn default_max_candidates_per_vote() -> usize {
    3
}

fn default_max_elected_validators() -> u32 {
    22
}

fn default_vote_out_percent() -> u64 {
    70
}

fn default_transition_period_heights() -> u64 {
    1
}

fn default_max_delegation_graph_size() -> usize {
    100_000
}

// 0x5B31Ea29271Cc0De13E17b67a8f94Dd0b8F4B959
fn default_token_contract() -> SourceAddress {
    SourceAddress::new([
        0x5b, 0x31, 0xea, 0x29, 0x27, 0x1c, 0xc0, 0xde, 0x13, 0xe1, 0x7b, 0x67, 0xa8, 0xf9, 0x4d,
        0xd0, 0xb8, 0xf4, 0xb9, 0x59,
    ])
}

// 0x45f398EEEff94528321F468192653147e72B5b41
fn default_voting_contract() -> SourceAddress {
    SourceAddress::new([
        0x45, 0xf3, 0x98, 0xee, 0xef, 0xf9, 0x45, 0x28, 0x32, 0x1f, 0x46, 0x81, 0x92, 0x65, 0x31,
        0x47, 0xe7, 0x2b, 0x5b, 0x41,
    ])
}

// 0x5Be109EC9BFAaC93719167FF66D8Bf22Acd9B3dC
fn default_validators_contract() -> SourceAddress {
    SourceAddress::new([
        0x5b, 0xe1, 0x09, 0xec, 0x9b, 0xfa, 0xac, 0x93, 0x71, 0x91, 0x67, 0xff, 0x66, 0xd8, 0xbf,
        0x22, 0xac, 0xd9, 0xb3, 0xdc,
    ])
}

// 0x78227F99Bb86652689B0790144Bbe60176020c61
fn default_validators_registry_contract() -> SourceAddress {
    SourceAddress::new([
        0x78, 0x22, 0x7f, 0x99, 0xbb, 0x86, 0x65, 0x26, 0x89, 0xb0, 0x79, 0x01, 0x44, 0xbb, 0xe6,
        0x01, 0x76, 0x02, 0x0c, 0x61,
    ])
}

// 0x93B4af9efa46B3F5185B20C20BF313e4ab73318e
fn default_guardians_contract() -> SourceAddress {
    SourceAddress::new([
        0x93, 0xb4, 0xaf, 0x9e, 0xfa, 0x46, 0xb3, 0xf5, 0x18, 0x5b, 0x20, 0xc2, 0x0b, 0xf3, 0x13,
        0xe4, 0xab, 0x73, 0x31, 0x8e,
    ])
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ElectionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("ElectionConfig is always serializable to TOML")
    }
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            stake_scaling_divisor: default_stake_scaling_divisor(),
            delegation_marker_amount: default_delegation_marker_amount(),
            mirror_period_blocks: default_mirror_period_blocks(),
            vote_validity_blocks: default_vote_validity_blocks(),
            election_period_blocks: default_election_period_blocks(),
            genesis_election_block: default_genesis_election_block(),
            max_candidates_per_vote: default_max_candidates_per_vote(),
            max_elected_validators: default_max_elected_validators(),
            vote_out_percent: default_vote_out_percent(),
            transition_period_heights: default_transition_period_heights(),
            max_delegation_graph_size: default_max_delegation_graph_size(),
            contracts: SourceContracts::default(),
        }
    }
}

impl Default for SourceContracts {
    fn default() -> Self {
        Self {
            token: default_token_contract(),
            voting: default_voting_contract(),
            validators: default_validators_contract(),
            validators_registry: default_validators_registry_contract(),
            guardians: default_guardians_contract(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ElectionConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = ElectionConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ElectionConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.mirror_period_blocks, 480);
        assert_eq!(config.vote_validity_blocks, 40_320);
        assert_eq!(config.election_period_blocks, 17_280);
        assert_eq!(config.genesis_election_block, 7_519_801);
        assert_eq!(config.delegation_marker_amount, 7);
        assert_eq!(config.vote_out_percent, 70);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            mirror_period_blocks = 10
            election_period_blocks = 100

            [contracts]
            token = "0x0101010101010101010101010101010101010101"
        "#;
        let config = ElectionConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.mirror_period_blocks, 10);
        assert_eq!(config.election_period_blocks, 100);
        assert_eq!(config.contracts.token, SourceAddress::new([1u8; 20]));
        assert_eq!(config.vote_out_percent, 70); // default
        assert_eq!(config.contracts.voting, SourceContracts::default().voting); // default
    }

    #[test]
    fn contract_addresses_parse_from_prefixed_hex() {
        let config = ElectionConfig::default();
        assert_eq!(
            config.contracts.token,
            SourceAddress::from_hex("0x5B31Ea29271Cc0De13E17b67a8f94Dd0b8F4B959").unwrap()
        );
        assert_eq!(
            config.contracts.guardians,
            SourceAddress::from_hex("0x93B4af9efa46B3F5185B20C20BF313e4ab73318e").unwrap()
        );
    }

    #[test]
    fn missing_file_returns_io_error() {
        let result = ElectionConfig::from_toml_file("/nonexistent/elector.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
