use elector_types::{SourceAddress, Stake, TargetAddress};

use crate::StoreError;

/// One member of the valid validator set fetched for the current election.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidValidatorRecord {
    pub address: SourceAddress,
    /// Target-chain identity; zero until collected.
    pub target: TargetAddress,
    /// Reserved; the tally never reads it.
    pub stake: Stake,
}

pub trait ValidValidatorStore {
    /// Replace the whole registry with fresh records (zero target, zero
    /// stake) in the given order. Runs at the start of every processing run.
    fn replace_validators(&self, addresses: &[SourceAddress]) -> Result<(), StoreError>;
    fn get_validator(&self, address: &SourceAddress)
        -> Result<Option<ValidValidatorRecord>, StoreError>;
    fn put_validator(&self, record: &ValidValidatorRecord) -> Result<(), StoreError>;
    fn validator_count(&self) -> Result<u32, StoreError>;
    fn validator_at(&self, index: u32) -> Result<SourceAddress, StoreError>;
}
