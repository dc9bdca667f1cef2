//! LMDB storage backend for the Elector engine.
//!
//! Implements all storage traits from `elector-store` using the `heed` LMDB
//! bindings. One [`LmdbEnvironment`] holds every database, so a single value
//! satisfies the engine's combined store bound. Every trait method runs in
//! its own transaction; multi-key updates (registry appends, registry
//! replacement) commit atomically.

pub mod delegator;
pub mod environment;
pub mod error;
pub mod guardian;
pub mod process;
pub mod results;
pub mod validator;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
