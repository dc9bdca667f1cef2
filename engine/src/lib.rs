//! The validator election engine.
//!
//! Computes the validator set of a target chain from delegation and vote-out
//! events on a source chain. Three surfaces:
//!
//! - **Mirroring**: relayers submit source-chain transaction references;
//!   the engine resolves each to a decoded event and keeps the latest
//!   declaration per delegator and per guardian, under strict
//!   (block, tx-index) supersession.
//! - **Processing**: a resumable state machine spreads an election run over
//!   many [`ElectionEngine::process_voting`] calls, at most one source-chain
//!   query each, with the cursor persisted between calls.
//! - **Results**: an append-only, 1-indexed election history with
//!   point-in-time lookup by source-chain block or local height.
//!
//! Storage and chain access are trait parameters (`elector-store`,
//! `elector-bridge`), so the engine itself stays deterministic: same store,
//! same chain answers, same elected set.

pub mod error;
mod mirror;
mod process;
mod results;
pub mod tally;

#[cfg(test)]
mod testutil;

pub use error::ElectionError;
pub use process::ProcessOutcome;
pub use tally::{TallyOutcome, TallySnapshot};

use elector_bridge::{HostChain, SourceChain};
use elector_store::ElectionStore;
use elector_types::ElectionConfig;

/// The election engine, generic over its store and its two chain bridges.
///
/// All election state lives in the store, so an engine value can be dropped
/// and rebuilt over the same store without losing progress; construction
/// only seeds the schedule of a store that has never held one.
pub struct ElectionEngine<S, B, H> {
    store: S,
    source: B,
    host: H,
    config: ElectionConfig,
}

impl<S, B, H> ElectionEngine<S, B, H>
where
    S: ElectionStore,
    B: SourceChain,
    H: HostChain,
{
    /// Build an engine over the given collaborators.
    ///
    /// When the store has never recorded an election block, the schedule is
    /// seeded with the configured genesis election block.
    pub fn new(store: S, source: B, host: H, config: ElectionConfig) -> Result<Self, ElectionError> {
        if store.election_block()? == 0 {
            store.set_election_block(config.genesis_election_block)?;
            tracing::info!(
                election_block = config.genesis_election_block,
                "seeded election schedule"
            );
        }
        Ok(Self { store, source, host, config })
    }

    /// Source-chain block of the election currently being mirrored and
    /// processed.
    pub fn election_block(&self) -> Result<u64, ElectionError> {
        Ok(self.store.election_block()?)
    }

    pub fn config(&self) -> &ElectionConfig {
        &self.config
    }

    /// The underlying store. Test drivers inspect mirrored state through it.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The source-chain bridge.
    pub fn source(&self) -> &B {
        &self.source
    }

    /// The host-chain bridge.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Split the engine back into its collaborators, e.g. to rebuild it over
    /// the same store.
    pub fn into_parts(self) -> (S, B, H, ElectionConfig) {
        (self.store, self.source, self.host, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{small_config, ELECTION_BLOCK};
    use elector_nullables::{NullHostChain, NullSourceChain, NullStore};
    use elector_store::ProcessStore;

    #[test]
    fn new_engine_seeds_genesis_election_block() {
        let engine = ElectionEngine::new(
            NullStore::new(),
            NullSourceChain::new(),
            NullHostChain::default(),
            small_config(),
        )
        .unwrap();

        assert_eq!(engine.election_block().unwrap(), ELECTION_BLOCK);
    }

    #[test]
    fn rebuilt_engine_keeps_existing_schedule() {
        let store = NullStore::new();
        store.set_election_block(4_242).unwrap();

        let engine = ElectionEngine::new(
            store,
            NullSourceChain::new(),
            NullHostChain::default(),
            small_config(),
        )
        .unwrap();

        assert_eq!(engine.election_block().unwrap(), 4_242);

        let (store, source, host, config) = engine.into_parts();
        let engine = ElectionEngine::new(store, source, host, config).unwrap();
        assert_eq!(engine.election_block().unwrap(), 4_242);
    }
}
