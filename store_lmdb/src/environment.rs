//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use elector_store::StoreError;
use elector_types::SourceAddress;

use crate::LmdbError;

pub(crate) const DELEGATOR_COUNT_KEY: &[u8] = b"delegator_count";
pub(crate) const GUARDIAN_COUNT_KEY: &[u8] = b"guardian_count";
pub(crate) const VALIDATOR_COUNT_KEY: &[u8] = b"validator_count";
pub(crate) const ELECTION_COUNT_KEY: &[u8] = b"election_count";
pub(crate) const PROCESS_STATE_KEY: &[u8] = b"process_state";
pub(crate) const ELECTION_BLOCK_KEY: &[u8] = b"election_block";

/// Wraps the LMDB environment and all database handles.
///
/// Record databases are keyed by the 20 address bytes; index databases map a
/// big-endian u32 registry index to the address it was assigned to; `meta`
/// holds counters and singleton values.
pub struct LmdbEnvironment {
    pub(crate) env: Arc<Env>,
    pub(crate) delegators_db: Database<Bytes, Bytes>,
    pub(crate) delegator_index_db: Database<Bytes, Bytes>,
    pub(crate) guardians_db: Database<Bytes, Bytes>,
    pub(crate) guardian_index_db: Database<Bytes, Bytes>,
    pub(crate) validators_db: Database<Bytes, Bytes>,
    pub(crate) validator_index_db: Database<Bytes, Bytes>,
    pub(crate) elections_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        // heed forbids opening the same path twice within one process.
        let env = unsafe {
            EnvOpenOptions::new()
                .max_dbs(max_dbs)
                .map_size(map_size)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let delegators_db = env.create_database(&mut wtxn, Some("delegators"))?;
        let delegator_index_db = env.create_database(&mut wtxn, Some("delegator_index"))?;
        let guardians_db = env.create_database(&mut wtxn, Some("guardians"))?;
        let guardian_index_db = env.create_database(&mut wtxn, Some("guardian_index"))?;
        let validators_db = env.create_database(&mut wtxn, Some("validators"))?;
        let validator_index_db = env.create_database(&mut wtxn, Some("validator_index"))?;
        let elections_db = env.create_database(&mut wtxn, Some("elections"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), map_size, "opened election store");

        Ok(Self {
            env: Arc::new(env),
            delegators_db,
            delegator_index_db,
            guardians_db,
            guardian_index_db,
            validators_db,
            validator_index_db,
            elections_db,
            meta_db,
        })
    }

    /// Read a u32 counter from the meta database; missing means 0.
    pub(crate) fn read_count(&self, txn: &RoTxn, key: &[u8]) -> Result<u32, StoreError> {
        match self.meta_db.get(txn, key).map_err(LmdbError::from)? {
            Some(bytes) => {
                if bytes.len() != 4 {
                    return Err(StoreError::Corruption("invalid counter bytes length".into()));
                }
                let mut buf = [0u8; 4];
                buf.copy_from_slice(bytes);
                Ok(u32::from_le_bytes(buf))
            }
            None => Ok(0),
        }
    }

    pub(crate) fn write_count(
        &self,
        txn: &mut RwTxn,
        key: &[u8],
        value: u32,
    ) -> Result<(), StoreError> {
        self.meta_db
            .put(txn, key, &value.to_le_bytes())
            .map_err(LmdbError::from)?;
        Ok(())
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

pub(crate) fn source_address_from_bytes(bytes: &[u8]) -> Result<SourceAddress, StoreError> {
    let arr: [u8; 20] = bytes
        .try_into()
        .map_err(|_| StoreError::Corruption("invalid address bytes length".into()))?;
    Ok(SourceAddress::new(arr))
}
