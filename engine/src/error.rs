//! Errors raised by the election engine.
//!
//! Every failure is scoped to the single invocation that raised it; the
//! engine never retries on its own. Where the remedy is to try again in a
//! later election, the message says so.

use elector_bridge::BridgeError;
use elector_store::StoreError;
use elector_types::{EventPosition, SourceAddress};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElectionError {
    /// A vote named more candidates than a single vote may carry.
    #[error("vote names {got} candidates, more than the allowed {max}")]
    TooManyCandidates { got: usize, max: usize },

    /// A transfer submitted as a delegation carried the wrong token amount.
    #[error("transfer amount {got} is not the delegation marker amount {expected}")]
    BadDelegationMarker { got: u128, expected: u128 },

    /// The voter was not a registered guardian when the vote happened.
    #[error("{voter} was not a guardian at block {block}")]
    NotAGuardian { voter: SourceAddress, block: u64 },

    /// The event does not strictly supersede what is already mirrored for
    /// its delegator or guardian.
    #[error("event for {key} at {incoming} is stale: an event at {stored} is already mirrored")]
    StaleEvent {
        key: SourceAddress,
        incoming: EventPosition,
        stored: EventPosition,
    },

    /// A delegation by transfer for a delegator who already delegated
    /// explicitly. Explicit delegations outrank the transfer convention.
    #[error("{delegator} already delegated explicitly; a transfer cannot change it")]
    DelegationMethodConflict { delegator: SourceAddress },

    /// The event happened after the election it was submitted for.
    #[error(
        "event at block {event_block} is after election block {election_block}, \
         resubmit next election"
    )]
    EventAfterElection { event_block: u64, election_block: u64 },

    /// Mirroring attempted after the mirror window closed.
    #[error(
        "mirror period for election {election_block} ended at current block {current_block}, \
         resubmit next election"
    )]
    MirrorWindowClosed { current_block: u64, election_block: u64 },

    /// Processing attempted before the mirror window closed.
    #[error(
        "mirror period for election {election_block} is still open at current block \
         {current_block}, cannot process"
    )]
    MirrorWindowOpen { current_block: u64, election_block: u64 },

    /// A computed election was not newer than the last recorded one.
    #[error("election at block {pending} is not newer than the last recorded election at {last}")]
    ElectionNotNewer { pending: u64, last: u64 },

    /// The delegation graph revisited a node or outgrew the configured
    /// bound while resolving a guardian's voting weight.
    #[error("cyclic or oversized delegation graph while resolving guardian {guardian}")]
    DelegationGraphCycle { guardian: SourceAddress },

    /// Checked arithmetic failed.
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
