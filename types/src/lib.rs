//! Fundamental types for the Elector engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses on both chains, event positions and references, stake amounts, the
//! processing cursor, and the engine configuration.

pub mod address;
pub mod config;
pub mod event;
pub mod process;
pub mod stake;

pub use address::{AddressParseError, SourceAddress, TargetAddress};
pub use config::{ConfigError, ElectionConfig, SourceContracts};
pub use event::{DelegationMethod, EventPosition, TxRef};
pub use process::{ProcessStage, ProcessState};
pub use stake::Stake;
