//! Recording and retrieval of election results.
//!
//! Results form an append-only, 1-indexed history. Recording translates the
//! elected source-chain addresses into target-chain addresses and stamps the
//! local height at which the set takes effect (current height plus the
//! transition period). Point-in-time queries scan newest to oldest for the
//! most recent record strictly older than the asked-for block or height and
//! fall back to the sentinel set when none qualifies.

use elector_bridge::{HostChain, SourceChain};
use elector_store::{ElectionRecord, ElectionStore, StoreError};
use elector_types::{SourceAddress, TargetAddress};

use crate::{ElectionEngine, ElectionError};

impl<S, B, H> ElectionEngine<S, B, H>
where
    S: ElectionStore,
    B: SourceChain,
    H: HostChain,
{
    /// Append the outcome of the election held at `election_block`.
    ///
    /// The block must strictly exceed the last recorded election's; history
    /// only ever moves forward.
    pub(crate) fn record_election(
        &self,
        election_block: u64,
        elected: &[SourceAddress],
    ) -> Result<(), ElectionError> {
        let count = self.store.election_count()?;
        if count > 0 {
            let last = self.store.election_at(count)?;
            if election_block <= last.block_number {
                return Err(ElectionError::ElectionNotNewer {
                    pending: election_block,
                    last: last.block_number,
                });
            }
        }

        let mut validators = Vec::with_capacity(elected.len());
        for address in elected {
            let record = self
                .store
                .get_validator(address)?
                .ok_or_else(|| StoreError::NotFound(format!("valid validator {address}")))?;
            validators.push(record.target);
        }

        let effective_height = self
            .host
            .block_height()
            .checked_add(self.config.transition_period_heights)
            .ok_or(ElectionError::Overflow("effective height"))?;
        self.store.append_election(&ElectionRecord {
            block_number: election_block,
            effective_height,
            validators,
        })?;
        tracing::info!(election_block, effective_height, index = count + 1, "recorded election");
        Ok(())
    }

    /// The most recently elected validator set; empty when no election has
    /// completed yet.
    pub fn elected_validators(&self) -> Result<Vec<TargetAddress>, ElectionError> {
        let count = self.store.election_count()?;
        if count == 0 {
            return Ok(Vec::new());
        }
        Ok(self.store.election_at(count)?.validators)
    }

    /// The validator set elected as of source-chain block `block_number`:
    /// the newest record strictly older than it. The sentinel set when every
    /// recorded election is at or past that block.
    pub fn elected_validators_by_block_number(
        &self,
        block_number: u64,
    ) -> Result<Vec<TargetAddress>, ElectionError> {
        let count = self.store.election_count()?;
        for index in (1..=count).rev() {
            let record = self.store.election_at(index)?;
            if record.block_number < block_number {
                return Ok(record.validators);
            }
        }
        Ok(vec![TargetAddress::SENTINEL])
    }

    /// The validator set in effect at local chain height `height`: the
    /// newest record whose effective height is strictly below it. The
    /// sentinel set when none qualifies.
    pub fn elected_validators_by_block_height(
        &self,
        height: u64,
    ) -> Result<Vec<TargetAddress>, ElectionError> {
        let count = self.store.election_count()?;
        for index in (1..=count).rev() {
            let record = self.store.election_at(index)?;
            if record.effective_height < height {
                return Ok(record.validators);
            }
        }
        Ok(vec![TargetAddress::SENTINEL])
    }

    /// The validator set of the `index`-th election, 1-based.
    pub fn elected_validators_by_index(
        &self,
        index: u32,
    ) -> Result<Vec<TargetAddress>, ElectionError> {
        Ok(self.store.election_at(index)?.validators)
    }

    /// The source-chain block of the `index`-th election, 1-based.
    pub fn election_block_number_by_index(&self, index: u32) -> Result<u64, ElectionError> {
        Ok(self.store.election_at(index)?.block_number)
    }

    /// The effective local height of the `index`-th election, 1-based.
    pub fn election_block_height_by_index(&self, index: u32) -> Result<u64, ElectionError> {
        Ok(self.store.election_at(index)?.effective_height)
    }

    /// How many elections have been recorded.
    pub fn number_of_elections(&self) -> Result<u32, ElectionError> {
        Ok(self.store.election_count()?)
    }
}
