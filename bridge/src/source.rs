//! Read access to the source chain.

use elector_types::{EventPosition, SourceAddress, TargetAddress, TxRef};

use crate::error::BridgeError;
use crate::event::{DelegationEvent, TransferEvent, VoteEvent};

/// Everything the engine reads from the source chain.
///
/// Log lookups resolve a relayer-submitted transaction reference against a
/// specific contract and return the decoded event along with its position in
/// source-chain history. The remaining calls are point-in-time contract
/// reads pinned to an explicit block, so a processing run observes one
/// consistent snapshot no matter when its calls execute.
pub trait SourceChain {
    /// The source chain's current block number.
    fn current_block(&self) -> Result<u64, BridgeError>;

    /// Decode the transfer log of `tx` on the token contract.
    fn transfer_log(
        &self,
        contract: &SourceAddress,
        tx: &TxRef,
    ) -> Result<(TransferEvent, EventPosition), BridgeError>;

    /// Decode the delegation log of `tx` on the voting contract.
    fn delegation_log(
        &self,
        contract: &SourceAddress,
        tx: &TxRef,
    ) -> Result<(DelegationEvent, EventPosition), BridgeError>;

    /// Decode the vote-out log of `tx` on the voting contract.
    fn vote_log(
        &self,
        contract: &SourceAddress,
        tx: &TxRef,
    ) -> Result<(VoteEvent, EventPosition), BridgeError>;

    /// The valid validator set registered on the validators contract at `block`.
    fn validator_set(
        &self,
        block: u64,
        contract: &SourceAddress,
    ) -> Result<Vec<SourceAddress>, BridgeError>;

    /// The target-chain address a validator registered at `block`.
    fn target_address(
        &self,
        block: u64,
        contract: &SourceAddress,
        validator: &SourceAddress,
    ) -> Result<TargetAddress, BridgeError>;

    /// Whether `address` was a guardian at `block`.
    fn is_guardian(
        &self,
        block: u64,
        contract: &SourceAddress,
        address: &SourceAddress,
    ) -> Result<bool, BridgeError>;

    /// Raw token balance of `address` at `block`.
    fn balance_of(
        &self,
        block: u64,
        contract: &SourceAddress,
        address: &SourceAddress,
    ) -> Result<u128, BridgeError>;
}
