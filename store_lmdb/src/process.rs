//! LMDB implementation of ProcessStore.

use elector_store::process::ProcessStore;
use elector_store::StoreError;
use elector_types::ProcessState;

use crate::environment::{decode, encode, ELECTION_BLOCK_KEY, PROCESS_STATE_KEY};
use crate::{LmdbEnvironment, LmdbError};

impl ProcessStore for LmdbEnvironment {
    fn process_state(&self) -> Result<ProcessState, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .meta_db
            .get(&rtxn, PROCESS_STATE_KEY)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => decode(bytes),
            None => Ok(ProcessState::default()),
        }
    }

    fn set_process_state(&self, state: ProcessState) -> Result<(), StoreError> {
        let val = encode(&state)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, PROCESS_STATE_KEY, &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn election_block(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .meta_db
            .get(&rtxn, ELECTION_BLOCK_KEY)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => {
                if bytes.len() != 8 {
                    return Err(StoreError::Corruption(
                        "invalid election block bytes length".into(),
                    ));
                }
                let mut buf = [0u8; 8];
                buf.copy_from_slice(bytes);
                Ok(u64::from_le_bytes(buf))
            }
            None => Ok(0),
        }
    }

    fn set_election_block(&self, block: u64) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, ELECTION_BLOCK_KEY, &block.to_le_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
