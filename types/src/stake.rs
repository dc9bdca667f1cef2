//! Stake amounts used for vote weighting.
//!
//! Source-chain token balances are u128 raw units; the engine scales them down
//! by a configured divisor before they enter any tally, so stakes fit in u64.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scaled stake amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Stake(u64);

impl Stake {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Scale a raw source-chain balance down to a stake.
    ///
    /// Returns `None` when the divisor is zero or the scaled value does not
    /// fit in u64.
    pub fn from_scaled_balance(balance: u128, divisor: u128) -> Option<Self> {
        let scaled = balance.checked_div(divisor)?;
        u64::try_from(scaled).ok().map(Self)
    }
}

impl fmt::Display for Stake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
