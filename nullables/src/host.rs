//! Nullable host chain — deterministic local height for testing.

use std::sync::atomic::{AtomicU64, Ordering};

use elector_bridge::HostChain;

/// A host chain whose height only moves when you tell it to.
pub struct NullHostChain {
    height: AtomicU64,
}

impl NullHostChain {
    pub fn new(initial_height: u64) -> Self {
        Self {
            height: AtomicU64::new(initial_height),
        }
    }

    pub fn set_height(&self, height: u64) {
        self.height.store(height, Ordering::Relaxed);
    }

    pub fn advance(&self, heights: u64) {
        self.height.fetch_add(heights, Ordering::Relaxed);
    }
}

impl Default for NullHostChain {
    fn default() -> Self {
        Self::new(0)
    }
}

impl HostChain for NullHostChain {
    fn block_height(&self) -> u64 {
        self.height.load(Ordering::Relaxed)
    }
}
