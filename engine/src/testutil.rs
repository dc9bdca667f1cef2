//! Shared helpers for the engine's unit tests.

use elector_nullables::{NullHostChain, NullSourceChain, NullStore};
use elector_types::{ElectionConfig, EventPosition, SourceAddress, TargetAddress};

use crate::ElectionEngine;

pub(crate) type TestEngine = ElectionEngine<NullStore, NullSourceChain, NullHostChain>;

/// Genesis election block of [`small_config`].
pub(crate) const ELECTION_BLOCK: u64 = 1_000;

/// Shrunk periods so tests can stay in small numbers. Stakes scale 1:1.
pub(crate) fn small_config() -> ElectionConfig {
    ElectionConfig {
        stake_scaling_divisor: 1,
        delegation_marker_amount: 7,
        mirror_period_blocks: 10,
        vote_validity_blocks: 100,
        election_period_blocks: 50,
        genesis_election_block: ELECTION_BLOCK,
        max_candidates_per_vote: 3,
        max_elected_validators: 22,
        vote_out_percent: 70,
        transition_period_heights: 1,
        max_delegation_graph_size: 1_000,
        contracts: Default::default(),
    }
}

/// Engine over nullables, with the source chain inside the mirror window of
/// the genesis election.
pub(crate) fn test_engine() -> TestEngine {
    let source = NullSourceChain::new();
    source.set_current_block(ELECTION_BLOCK);
    ElectionEngine::new(NullStore::new(), source, NullHostChain::default(), small_config())
        .expect("engine over fresh nullables")
}

pub(crate) fn addr(n: u8) -> SourceAddress {
    SourceAddress::new([n; 20])
}

pub(crate) fn target(n: u8) -> TargetAddress {
    TargetAddress::new([n; 20])
}

pub(crate) fn pos(block_number: u64, tx_index: u32) -> EventPosition {
    EventPosition::new(block_number, tx_index)
}
