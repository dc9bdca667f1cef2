//! Persistence for the processing cursor and the election schedule.

use elector_types::ProcessState;

use crate::StoreError;

pub trait ProcessStore {
    /// The persisted processing cursor; `ProcessState::default()` when none
    /// has been written yet.
    fn process_state(&self) -> Result<ProcessState, StoreError>;

    fn set_process_state(&self, state: ProcessState) -> Result<(), StoreError>;

    /// Source-chain block of the next election; 0 when never seeded.
    fn election_block(&self) -> Result<u64, StoreError>;

    fn set_election_block(&self, block: u64) -> Result<(), StoreError>;
}
