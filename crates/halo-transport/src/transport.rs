//! The transport abstraction consumed by the exchanger.

use halo_core::{Direction, TransportError, WorkerId};

/// Whether a completed request was a send or a receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    /// Outbound transfer.
    Send,
    /// Inbound transfer.
    Recv,
}

/// A request observed complete by [`Transport::wait_all`].
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    /// Send or receive.
    pub kind: OperationKind,
    /// The other endpoint.
    pub peer: WorkerId,
    /// Message tag.
    pub tag: Direction,
    /// Received values. Empty for sends: the send buffer was moved to
    /// the receiver.
    pub data: Vec<f64>,
}

/// Point-to-point messaging between workers of one pool.
///
/// Messages are addressed by `(peer, tag)`. Two messages with the same
/// sender, receiver and tag are delivered in issue order.
///
/// Non-blocking operations take ownership of their buffers: a send
/// buffer is moved into the request, and a receive buffer only becomes
/// visible through the [`Completion`] returned by `wait_all`. A buffer
/// referenced by an outstanding operation can therefore never be read,
/// mutated or freed by the caller before completion is observed.
pub trait Transport {
    /// Handle for an operation issued without blocking.
    type Request;

    /// This worker's identifier.
    fn rank(&self) -> WorkerId;

    /// Number of workers in the pool.
    fn pool_size(&self) -> usize;

    /// Synchronous send. Returns once `dest` has begun the matching
    /// receive.
    fn ssend(&self, dest: WorkerId, tag: Direction, data: &[f64]) -> Result<(), TransportError>;

    /// Blocking receive into `buf`. The message must be exactly
    /// `buf.len()` values long.
    fn recv(&self, source: WorkerId, tag: Direction, buf: &mut [f64]) -> Result<(), TransportError>;

    /// Issue a synchronous send without blocking.
    fn issend(
        &self,
        dest: WorkerId,
        tag: Direction,
        data: Vec<f64>,
    ) -> Result<Self::Request, TransportError>;

    /// Issue a receive of `len` values without blocking.
    fn irecv(
        &self,
        source: WorkerId,
        tag: Direction,
        len: usize,
    ) -> Result<Self::Request, TransportError>;

    /// Block until every request has completed.
    ///
    /// Completions are returned in the order the requests were passed
    /// in, regardless of the order in which they finished.
    fn wait_all(&self, requests: Vec<Self::Request>) -> Result<Vec<Completion>, TransportError>;
}
