//! LMDB implementation of ValidValidatorStore.

use elector_store::validator::{ValidValidatorRecord, ValidValidatorStore};
use elector_store::StoreError;
use elector_types::{SourceAddress, Stake, TargetAddress};

use crate::environment::{decode, encode, source_address_from_bytes, VALIDATOR_COUNT_KEY};
use crate::{LmdbEnvironment, LmdbError};

impl ValidValidatorStore for LmdbEnvironment {
    fn replace_validators(&self, addresses: &[SourceAddress]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.validators_db.clear(&mut wtxn).map_err(LmdbError::from)?;
        self.validator_index_db
            .clear(&mut wtxn)
            .map_err(LmdbError::from)?;

        for (index, address) in addresses.iter().enumerate() {
            let record = ValidValidatorRecord {
                address: *address,
                target: TargetAddress::ZERO,
                stake: Stake::ZERO,
            };
            self.validator_index_db
                .put(&mut wtxn, &(index as u32).to_be_bytes(), address.as_bytes())
                .map_err(LmdbError::from)?;
            self.validators_db
                .put(&mut wtxn, address.as_bytes(), &encode(&record)?)
                .map_err(LmdbError::from)?;
        }

        self.write_count(&mut wtxn, VALIDATOR_COUNT_KEY, addresses.len() as u32)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_validator(
        &self,
        address: &SourceAddress,
    ) -> Result<Option<ValidValidatorRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .validators_db
            .get(&rtxn, address.as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn put_validator(&self, record: &ValidValidatorRecord) -> Result<(), StoreError> {
        let val = encode(record)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.validators_db
            .put(&mut wtxn, record.address.as_bytes(), &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn validator_count(&self) -> Result<u32, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        self.read_count(&rtxn, VALIDATOR_COUNT_KEY)
    }

    fn validator_at(&self, index: u32) -> Result<SourceAddress, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .validator_index_db
            .get(&rtxn, &index.to_be_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => source_address_from_bytes(bytes),
            None => Err(StoreError::NotFound(format!("validator index {index}"))),
        }
    }
}
