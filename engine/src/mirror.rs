//! Mirroring of source-chain delegation and vote events.
//!
//! Relayers watch the source chain and resubmit what they see as transaction
//! references. A reference is accepted only while the mirror window of the
//! current election is open, only if the event happened at or before the
//! election block, and only if it strictly supersedes whatever is already
//! mirrored for the same delegator or guardian. The latest valid declaration
//! wins; everything else fails with a typed error and leaves state untouched,
//! so replaying a reference in any order converges on the same state.

use elector_bridge::{HostChain, SourceChain};
use elector_store::{DelegatorRecord, ElectionStore, GuardianRecord};
use elector_types::{DelegationMethod, EventPosition, SourceAddress, Stake, TxRef};

use crate::{ElectionEngine, ElectionError};

impl<S, B, H> ElectionEngine<S, B, H>
where
    S: ElectionStore,
    B: SourceChain,
    H: HostChain,
{
    /// Mirror an explicit delegation event logged by the voting contract.
    pub fn mirror_delegation(&self, tx: &TxRef) -> Result<(), ElectionError> {
        self.ensure_mirror_window_open()?;
        let (event, position) = self.source.delegation_log(&self.config.contracts.voting, tx)?;
        self.apply_delegation(event.delegator, event.to, position, DelegationMethod::Delegate)
    }

    /// Mirror a delegation declared by transferring the marker amount on the
    /// token contract.
    pub fn mirror_delegation_by_transfer(&self, tx: &TxRef) -> Result<(), ElectionError> {
        self.ensure_mirror_window_open()?;
        let (event, position) = self.source.transfer_log(&self.config.contracts.token, tx)?;
        if event.value != self.config.delegation_marker_amount {
            return Err(ElectionError::BadDelegationMarker {
                got: event.value,
                expected: self.config.delegation_marker_amount,
            });
        }
        self.apply_delegation(event.from, event.to, position, DelegationMethod::Transfer)
    }

    /// Mirror a guardian's vote-out event logged by the voting contract.
    pub fn mirror_vote(&self, tx: &TxRef) -> Result<(), ElectionError> {
        self.ensure_mirror_window_open()?;
        let (event, position) = self.source.vote_log(&self.config.contracts.voting, tx)?;

        if event.candidates.len() > self.config.max_candidates_per_vote {
            return Err(ElectionError::TooManyCandidates {
                got: event.candidates.len(),
                max: self.config.max_candidates_per_vote,
            });
        }
        // Guardian status is checked at the block the vote happened in;
        // stake and continued membership are re-checked at processing time.
        if !self.source.is_guardian(
            position.block_number,
            &self.config.contracts.guardians,
            &event.voter,
        )? {
            return Err(ElectionError::NotAGuardian {
                voter: event.voter,
                block: position.block_number,
            });
        }
        self.ensure_at_or_before_election(position)?;

        let existing = self.store.get_guardian(&event.voter)?;
        if let Some(record) = &existing {
            Self::ensure_strictly_newer(event.voter, position, record.position)?;
        }

        let candidates = event.candidates.len();
        let stake = existing.as_ref().map(|r| r.stake).unwrap_or(Stake::ZERO);
        if existing.is_none() {
            self.store.append_guardian(&event.voter)?;
        }
        self.store.put_guardian(&GuardianRecord {
            address: event.voter,
            candidates: event.candidates,
            position,
            stake,
        })?;
        tracing::debug!(guardian = %event.voter, candidates, position = %position, "mirrored vote");
        Ok(())
    }

    fn apply_delegation(
        &self,
        delegator: SourceAddress,
        agent: SourceAddress,
        position: EventPosition,
        method: DelegationMethod,
    ) -> Result<(), ElectionError> {
        self.ensure_at_or_before_election(position)?;

        let existing = self.store.get_delegator(&delegator)?;
        if let Some(record) = &existing {
            // An explicit delegation outranks the transfer convention: no
            // transfer, however new, may overwrite it.
            if record.method == DelegationMethod::Delegate && method == DelegationMethod::Transfer {
                return Err(ElectionError::DelegationMethodConflict { delegator });
            }
            Self::ensure_strictly_newer(delegator, position, record.position)?;
        }

        let stake = existing.as_ref().map(|r| r.stake).unwrap_or(Stake::ZERO);
        if existing.is_none() {
            self.store.append_delegator(&delegator)?;
        }
        self.store.put_delegator(&DelegatorRecord {
            address: delegator,
            agent,
            position,
            method,
            stake,
        })?;
        tracing::debug!(
            delegator = %delegator,
            agent = %agent,
            position = %position,
            method = %method,
            "mirrored delegation"
        );
        Ok(())
    }

    /// Fails unless the source chain is still inside the mirror window of
    /// the current election.
    fn ensure_mirror_window_open(&self) -> Result<(), ElectionError> {
        let current_block = self.source.current_block()?;
        let election_block = self.store.election_block()?;
        if current_block > election_block.saturating_add(self.config.mirror_period_blocks) {
            return Err(ElectionError::MirrorWindowClosed {
                current_block,
                election_block,
            });
        }
        Ok(())
    }

    fn ensure_at_or_before_election(&self, position: EventPosition) -> Result<(), ElectionError> {
        let election_block = self.store.election_block()?;
        if position.block_number > election_block {
            return Err(ElectionError::EventAfterElection {
                event_block: position.block_number,
                election_block,
            });
        }
        Ok(())
    }

    fn ensure_strictly_newer(
        key: SourceAddress,
        incoming: EventPosition,
        stored: EventPosition,
    ) -> Result<(), ElectionError> {
        if incoming <= stored {
            return Err(ElectionError::StaleEvent {
                key,
                incoming,
                stored,
            });
        }
        Ok(())
    }
}
