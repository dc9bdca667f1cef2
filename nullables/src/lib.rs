//! Nullable infrastructure for deterministic testing.
//!
//! The engine's external collaborators (storage, the source chain, the host
//! chain) all sit behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod host;
pub mod source_chain;
pub mod store;

pub use host::NullHostChain;
pub use source_chain::NullSourceChain;
pub use store::NullStore;
