use elector_types::{DelegationMethod, EventPosition, SourceAddress, Stake};

use crate::StoreError;

/// The mirrored state of one delegator.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DelegatorRecord {
    pub address: SourceAddress,
    /// Who the delegator currently delegates to.
    pub agent: SourceAddress,
    /// Position of the event that produced this state.
    pub position: EventPosition,
    pub method: DelegationMethod,
    /// Scaled stake at the election block; zero until collected.
    pub stake: Stake,
}

pub trait DelegatorStore {
    fn get_delegator(&self, address: &SourceAddress) -> Result<Option<DelegatorRecord>, StoreError>;
    fn put_delegator(&self, record: &DelegatorRecord) -> Result<(), StoreError>;
    /// Assign the next registry index to a first-seen delegator.
    fn append_delegator(&self, address: &SourceAddress) -> Result<(), StoreError>;
    fn delegator_count(&self) -> Result<u32, StoreError>;
    fn delegator_at(&self, index: u32) -> Result<SourceAddress, StoreError>;
}
