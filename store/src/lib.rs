//! Abstract storage traits for the Elector engine.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The engine depends only on the traits.
//!
//! Delegators, guardians and valid validators share one shape: a record
//! keyed by source-chain address plus a zero-based registry assigning each
//! address a dense index, so the processing state machine can walk the
//! population one item per call. Election results are an append-only
//! 1-indexed log.

pub mod delegator;
pub mod error;
pub mod guardian;
pub mod process;
pub mod results;
pub mod validator;

pub use delegator::{DelegatorRecord, DelegatorStore};
pub use error::StoreError;
pub use guardian::{GuardianRecord, GuardianStore};
pub use process::ProcessStore;
pub use results::{ElectionRecord, ElectionResultsStore};
pub use validator::{ValidValidatorRecord, ValidValidatorStore};

/// Everything the engine needs from a backend, as one bound.
pub trait ElectionStore:
    DelegatorStore + GuardianStore + ValidValidatorStore + ElectionResultsStore + ProcessStore
{
}

impl<T> ElectionStore for T where
    T: DelegatorStore + GuardianStore + ValidValidatorStore + ElectionResultsStore + ProcessStore
{
}
