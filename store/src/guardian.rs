use elector_types::{EventPosition, SourceAddress, Stake};

use crate::StoreError;

/// The mirrored state of one guardian's vote.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GuardianRecord {
    pub address: SourceAddress,
    /// Validators this guardian votes out. Empty votes for nobody out.
    pub candidates: Vec<SourceAddress>,
    /// Position of the vote event that produced this state.
    pub position: EventPosition,
    /// Scaled stake at the election block; zero until collected.
    pub stake: Stake,
}

pub trait GuardianStore {
    fn get_guardian(&self, address: &SourceAddress) -> Result<Option<GuardianRecord>, StoreError>;
    fn put_guardian(&self, record: &GuardianRecord) -> Result<(), StoreError>;
    /// Assign the next registry index to a first-seen guardian.
    fn append_guardian(&self, address: &SourceAddress) -> Result<(), StoreError>;
    fn guardian_count(&self) -> Result<u32, StoreError>;
    fn guardian_at(&self, index: u32) -> Result<SourceAddress, StoreError>;
}
