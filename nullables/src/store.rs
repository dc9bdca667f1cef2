//! Nullable store — thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use elector_store::delegator::{DelegatorRecord, DelegatorStore};
use elector_store::guardian::{GuardianRecord, GuardianStore};
use elector_store::process::ProcessStore;
use elector_store::results::{ElectionRecord, ElectionResultsStore};
use elector_store::validator::{ValidValidatorRecord, ValidValidatorStore};
use elector_store::StoreError;
use elector_types::{ProcessState, SourceAddress, Stake, TargetAddress};

/// An in-memory implementation of every election store trait.
pub struct NullStore {
    delegators: Mutex<HashMap<SourceAddress, DelegatorRecord>>,
    delegator_index: Mutex<Vec<SourceAddress>>,
    guardians: Mutex<HashMap<SourceAddress, GuardianRecord>>,
    guardian_index: Mutex<Vec<SourceAddress>>,
    validators: Mutex<HashMap<SourceAddress, ValidValidatorRecord>>,
    validator_index: Mutex<Vec<SourceAddress>>,
    elections: Mutex<Vec<ElectionRecord>>,
    process: Mutex<ProcessState>,
    election_block: Mutex<u64>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            delegators: Mutex::new(HashMap::new()),
            delegator_index: Mutex::new(Vec::new()),
            guardians: Mutex::new(HashMap::new()),
            guardian_index: Mutex::new(Vec::new()),
            validators: Mutex::new(HashMap::new()),
            validator_index: Mutex::new(Vec::new()),
            elections: Mutex::new(Vec::new()),
            process: Mutex::new(ProcessState::default()),
            election_block: Mutex::new(0),
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DelegatorStore for NullStore {
    fn get_delegator(
        &self,
        address: &SourceAddress,
    ) -> Result<Option<DelegatorRecord>, StoreError> {
        Ok(self.delegators.lock().unwrap().get(address).cloned())
    }

    fn put_delegator(&self, record: &DelegatorRecord) -> Result<(), StoreError> {
        self.delegators
            .lock()
            .unwrap()
            .insert(record.address, record.clone());
        Ok(())
    }

    fn append_delegator(&self, address: &SourceAddress) -> Result<(), StoreError> {
        self.delegator_index.lock().unwrap().push(*address);
        Ok(())
    }

    fn delegator_count(&self) -> Result<u32, StoreError> {
        Ok(self.delegator_index.lock().unwrap().len() as u32)
    }

    fn delegator_at(&self, index: u32) -> Result<SourceAddress, StoreError> {
        self.delegator_index
            .lock()
            .unwrap()
            .get(index as usize)
            .copied()
            .ok_or_else(|| StoreError::NotFound(format!("delegator index {index}")))
    }
}

impl GuardianStore for NullStore {
    fn get_guardian(&self, address: &SourceAddress) -> Result<Option<GuardianRecord>, StoreError> {
        Ok(self.guardians.lock().unwrap().get(address).cloned())
    }

    fn put_guardian(&self, record: &GuardianRecord) -> Result<(), StoreError> {
        self.guardians
            .lock()
            .unwrap()
            .insert(record.address, record.clone());
        Ok(())
    }

    fn append_guardian(&self, address: &SourceAddress) -> Result<(), StoreError> {
        self.guardian_index.lock().unwrap().push(*address);
        Ok(())
    }

    fn guardian_count(&self) -> Result<u32, StoreError> {
        Ok(self.guardian_index.lock().unwrap().len() as u32)
    }

    fn guardian_at(&self, index: u32) -> Result<SourceAddress, StoreError> {
        self.guardian_index
            .lock()
            .unwrap()
            .get(index as usize)
            .copied()
            .ok_or_else(|| StoreError::NotFound(format!("guardian index {index}")))
    }
}

impl ValidValidatorStore for NullStore {
    fn replace_validators(&self, addresses: &[SourceAddress]) -> Result<(), StoreError> {
        let mut validators = self.validators.lock().unwrap();
        let mut index = self.validator_index.lock().unwrap();
        validators.clear();
        index.clear();
        for address in addresses {
            validators.insert(
                *address,
                ValidValidatorRecord {
                    address: *address,
                    target: TargetAddress::ZERO,
                    stake: Stake::ZERO,
                },
            );
            index.push(*address);
        }
        Ok(())
    }

    fn get_validator(
        &self,
        address: &SourceAddress,
    ) -> Result<Option<ValidValidatorRecord>, StoreError> {
        Ok(self.validators.lock().unwrap().get(address).cloned())
    }

    fn put_validator(&self, record: &ValidValidatorRecord) -> Result<(), StoreError> {
        self.validators
            .lock()
            .unwrap()
            .insert(record.address, record.clone());
        Ok(())
    }

    fn validator_count(&self) -> Result<u32, StoreError> {
        Ok(self.validator_index.lock().unwrap().len() as u32)
    }

    fn validator_at(&self, index: u32) -> Result<SourceAddress, StoreError> {
        self.validator_index
            .lock()
            .unwrap()
            .get(index as usize)
            .copied()
            .ok_or_else(|| StoreError::NotFound(format!("validator index {index}")))
    }
}

impl ElectionResultsStore for NullStore {
    fn election_count(&self) -> Result<u32, StoreError> {
        Ok(self.elections.lock().unwrap().len() as u32)
    }

    fn election_at(&self, index: u32) -> Result<ElectionRecord, StoreError> {
        if index == 0 {
            return Err(StoreError::NotFound(format!("election index {index}")));
        }
        self.elections
            .lock()
            .unwrap()
            .get(index as usize - 1)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("election index {index}")))
    }

    fn append_election(&self, record: &ElectionRecord) -> Result<(), StoreError> {
        self.elections.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn put_election_at(&self, index: u32, record: &ElectionRecord) -> Result<(), StoreError> {
        let mut elections = self.elections.lock().unwrap();
        if index == 0 || index as usize > elections.len() {
            return Err(StoreError::NotFound(format!("election index {index}")));
        }
        elections[index as usize - 1] = record.clone();
        Ok(())
    }
}

impl ProcessStore for NullStore {
    fn process_state(&self) -> Result<ProcessState, StoreError> {
        Ok(*self.process.lock().unwrap())
    }

    fn set_process_state(&self, state: ProcessState) -> Result<(), StoreError> {
        *self.process.lock().unwrap() = state;
        Ok(())
    }

    fn election_block(&self) -> Result<u64, StoreError> {
        Ok(*self.election_block.lock().unwrap())
    }

    fn set_election_block(&self, block: u64) -> Result<(), StoreError> {
        *self.election_block.lock().unwrap() = block;
        Ok(())
    }
}
