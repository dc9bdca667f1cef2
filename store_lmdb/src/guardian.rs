//! LMDB implementation of GuardianStore.

use elector_store::guardian::{GuardianRecord, GuardianStore};
use elector_store::StoreError;
use elector_types::SourceAddress;

use crate::environment::{decode, encode, source_address_from_bytes, GUARDIAN_COUNT_KEY};
use crate::{LmdbEnvironment, LmdbError};

impl GuardianStore for LmdbEnvironment {
    fn get_guardian(&self, address: &SourceAddress) -> Result<Option<GuardianRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .guardians_db
            .get(&rtxn, address.as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn put_guardian(&self, record: &GuardianRecord) -> Result<(), StoreError> {
        let val = encode(record)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.guardians_db
            .put(&mut wtxn, record.address.as_bytes(), &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn append_guardian(&self, address: &SourceAddress) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let count = self.read_count(&wtxn, GUARDIAN_COUNT_KEY)?;
        self.guardian_index_db
            .put(&mut wtxn, &count.to_be_bytes(), address.as_bytes())
            .map_err(LmdbError::from)?;
        self.write_count(&mut wtxn, GUARDIAN_COUNT_KEY, count + 1)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn guardian_count(&self) -> Result<u32, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        self.read_count(&rtxn, GUARDIAN_COUNT_KEY)
    }

    fn guardian_at(&self, index: u32) -> Result<SourceAddress, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .guardian_index_db
            .get(&rtxn, &index.to_be_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => source_address_from_bytes(bytes),
            None => Err(StoreError::NotFound(format!("guardian index {index}"))),
        }
    }
}
