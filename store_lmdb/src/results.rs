//! LMDB implementation of ElectionResultsStore.

use elector_store::results::{ElectionRecord, ElectionResultsStore};
use elector_store::StoreError;

use crate::environment::{decode, encode, ELECTION_COUNT_KEY};
use crate::{LmdbEnvironment, LmdbError};

impl ElectionResultsStore for LmdbEnvironment {
    fn election_count(&self) -> Result<u32, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        self.read_count(&rtxn, ELECTION_COUNT_KEY)
    }

    fn election_at(&self, index: u32) -> Result<ElectionRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .elections_db
            .get(&rtxn, &index.to_be_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => decode(bytes),
            None => Err(StoreError::NotFound(format!("election index {index}"))),
        }
    }

    fn append_election(&self, record: &ElectionRecord) -> Result<(), StoreError> {
        let val = encode(record)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let index = self.read_count(&wtxn, ELECTION_COUNT_KEY)? + 1;
        self.elections_db
            .put(&mut wtxn, &index.to_be_bytes(), &val)
            .map_err(LmdbError::from)?;
        self.write_count(&mut wtxn, ELECTION_COUNT_KEY, index)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn put_election_at(&self, index: u32, record: &ElectionRecord) -> Result<(), StoreError> {
        let val = encode(record)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let count = self.read_count(&wtxn, ELECTION_COUNT_KEY)?;
        if index == 0 || index > count {
            return Err(StoreError::NotFound(format!("election index {index}")));
        }
        self.elections_db
            .put(&mut wtxn, &index.to_be_bytes(), &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
