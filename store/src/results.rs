//! The append-only election results log.

use elector_types::TargetAddress;

use crate::StoreError;

/// One recorded election.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ElectionRecord {
    /// Source-chain block the election was held at.
    pub block_number: u64,
    /// Target-chain height at which the result takes effect.
    pub effective_height: u64,
    /// The elected validator set, translated to target-chain addresses.
    pub validators: Vec<TargetAddress>,
}

/// Results are 1-indexed: the first election is index 1, the latest is
/// `election_count()`.
pub trait ElectionResultsStore {
    fn election_count(&self) -> Result<u32, StoreError>;

    /// Fetch the record at a 1-based index. Out of range is `NotFound`.
    fn election_at(&self, index: u32) -> Result<ElectionRecord, StoreError>;

    /// Append a record as the new latest election.
    fn append_election(&self, record: &ElectionRecord) -> Result<(), StoreError>;

    /// Overwrite the record at a 1-based, in-range index. Test support;
    /// the production flow only ever appends.
    fn put_election_at(&self, index: u32, record: &ElectionRecord) -> Result<(), StoreError>;
}
