//! Chain-facing traits consumed by the Elector engine.
//!
//! The engine never talks to a chain directly. Everything it needs from the
//! source chain (decoded event logs, point-in-time contract reads, the
//! current block) and from its own host chain (the local height) comes
//! through the traits here, so a deployment can plug in a real bridge client
//! while tests plug in the nullable implementations.

pub mod error;
pub mod event;
pub mod host;
pub mod source;

pub use error::BridgeError;
pub use event::{DelegationEvent, TransferEvent, VoteEvent};
pub use host::HostChain;
pub use source::SourceChain;
