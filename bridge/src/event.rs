//! Decoded source-chain event logs.

use elector_types::SourceAddress;

/// A token transfer. Transfers of the configured marker amount declare a
/// delegation from `from` to `to`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferEvent {
    pub from: SourceAddress,
    pub to: SourceAddress,
    /// Raw (unscaled) token amount.
    pub value: u128,
}

/// An explicit delegation declared on the voting contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegationEvent {
    pub delegator: SourceAddress,
    pub to: SourceAddress,
}

/// A vote-out cast on the voting contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteEvent {
    pub voter: SourceAddress,
    pub candidates: Vec<SourceAddress>,
}
