//! LMDB implementation of DelegatorStore.

use elector_store::delegator::{DelegatorRecord, DelegatorStore};
use elector_store::StoreError;
use elector_types::SourceAddress;

use crate::environment::{decode, encode, source_address_from_bytes, DELEGATOR_COUNT_KEY};
use crate::{LmdbEnvironment, LmdbError};

impl DelegatorStore for LmdbEnvironment {
    fn get_delegator(
        &self,
        address: &SourceAddress,
    ) -> Result<Option<DelegatorRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .delegators_db
            .get(&rtxn, address.as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn put_delegator(&self, record: &DelegatorRecord) -> Result<(), StoreError> {
        let val = encode(record)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.delegators_db
            .put(&mut wtxn, record.address.as_bytes(), &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn append_delegator(&self, address: &SourceAddress) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let count = self.read_count(&wtxn, DELEGATOR_COUNT_KEY)?;
        self.delegator_index_db
            .put(&mut wtxn, &count.to_be_bytes(), address.as_bytes())
            .map_err(LmdbError::from)?;
        self.write_count(&mut wtxn, DELEGATOR_COUNT_KEY, count + 1)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delegator_count(&self) -> Result<u32, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        self.read_count(&rtxn, DELEGATOR_COUNT_KEY)
    }

    fn delegator_at(&self, index: u32) -> Result<SourceAddress, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .delegator_index_db
            .get(&rtxn, &index.to_be_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => source_address_from_bytes(bytes),
            None => Err(StoreError::NotFound(format!("delegator index {index}"))),
        }
    }
}
