//! Read access to the chain the engine runs on.

/// The one thing the engine needs from its host: the local block height,
/// used to stamp when a recorded election takes effect.
pub trait HostChain {
    fn block_height(&self) -> u64;
}
