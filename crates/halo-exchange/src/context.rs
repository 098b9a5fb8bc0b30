//! Explicit communication context.

use halo_core::WorkerId;
use halo_transport::Transport;

/// A worker's handle on the pool: its identifier, the pool size, and
/// the transport used to reach its peers.
///
/// Every exchange call receives the context explicitly; nothing in the
/// exchange layer reads process-wide communicator state.
#[derive(Debug)]
pub struct CommContext<T: Transport> {
    rank: WorkerId,
    pool_size: usize,
    transport: T,
}

impl<T: Transport> CommContext<T> {
    /// Wrap a transport endpoint. Rank and pool size are taken from it.
    pub fn new(transport: T) -> Self {
        Self {
            rank: transport.rank(),
            pool_size: transport.pool_size(),
            transport,
        }
    }

    /// This worker's identifier.
    pub fn rank(&self) -> WorkerId {
        self.rank
    }

    /// Number of workers in the pool.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
