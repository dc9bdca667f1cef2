//! Source-chain event identity: transaction references, positions, methods.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque reference to a source-chain transaction, as submitted by a
/// mirroring relayer. The bridge resolves it to a decoded event log.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxRef(String);

impl TxRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an event sits in source-chain history.
///
/// The derived ordering compares `block_number` first and `tx_index` second,
/// which is exactly the supersession order for mirrored events: a stored
/// event is replaced only by one at a strictly greater position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventPosition {
    pub block_number: u64,
    pub tx_index: u32,
}

impl EventPosition {
    pub fn new(block_number: u64, tx_index: u32) -> Self {
        Self { block_number, tx_index }
    }
}

impl fmt::Display for EventPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block_number, self.tx_index)
    }
}

/// How a delegation was declared on the source chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelegationMethod {
    /// An explicit delegation call on the voting contract.
    Delegate,
    /// A token transfer of the marker amount. Weaker than [`Self::Delegate`]:
    /// once a delegator has delegated explicitly, transfers can no longer
    /// change the delegation.
    Transfer,
}

impl DelegationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delegate => "delegate",
            Self::Transfer => "transfer",
        }
    }
}

impl fmt::Display for DelegationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
