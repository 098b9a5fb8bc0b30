//! In-process transport over zero-capacity crossbeam channels.
//!
//! Each `(sender, receiver, tag)` triple gets its own rendezvous
//! channel. A send on a zero-capacity channel only completes once the
//! receiver has taken the message, which is exactly synchronous-send
//! semantics. When a worker drops its [`ChannelTransport`] its channel
//! ends disconnect, and peers blocked on it observe
//! [`TransportError::Disconnected`] instead of hanging.

use crossbeam_channel::{bounded, Receiver, Select, Sender};
use indexmap::IndexMap;

use halo_core::{Direction, TransportError, WorkerId};

use crate::transport::{Completion, OperationKind, Transport};

type Key = (WorkerId, Direction);

/// Builder for a fully connected pool of [`ChannelTransport`]s.
#[derive(Debug)]
pub struct ChannelFabric;

impl ChannelFabric {
    /// Wire `pool_size` endpoints together, one per worker, in rank
    /// order. Move each endpoint into its worker's thread.
    pub fn build(pool_size: usize) -> Vec<ChannelTransport> {
        let mut endpoints: Vec<ChannelTransport> = (0..pool_size)
            .map(|rank| ChannelTransport {
                rank: WorkerId(rank),
                pool_size,
                outbound: IndexMap::new(),
                inbound: IndexMap::new(),
            })
            .collect();

        for src in 0..pool_size {
            for dst in (0..pool_size).filter(|&d| d != src) {
                for tag in Direction::ALL {
                    let (tx, rx) = bounded(0);
                    endpoints[src].outbound.insert((WorkerId(dst), tag), tx);
                    endpoints[dst].inbound.insert((WorkerId(src), tag), rx);
                }
            }
        }

        tracing::debug!(pool_size, "channel fabric built");
        endpoints
    }
}

/// One worker's view of a [`ChannelFabric`].
#[derive(Debug)]
pub struct ChannelTransport {
    rank: WorkerId,
    pool_size: usize,
    outbound: IndexMap<Key, Sender<Vec<f64>>>,
    inbound: IndexMap<Key, Receiver<Vec<f64>>>,
}

/// An operation issued by [`ChannelTransport::issend`] or
/// [`ChannelTransport::irecv`], completed by
/// [`ChannelTransport::wait_all`].
#[derive(Debug)]
pub struct ChannelRequest {
    peer: WorkerId,
    tag: Direction,
    op: PendingOp,
}

impl ChannelRequest {
    /// The other endpoint.
    pub fn peer(&self) -> WorkerId {
        self.peer
    }

    /// Message tag.
    pub fn tag(&self) -> Direction {
        self.tag
    }

    /// Send or receive.
    pub fn kind(&self) -> OperationKind {
        match self.op {
            PendingOp::Send { .. } => OperationKind::Send,
            PendingOp::Recv { .. } => OperationKind::Recv,
        }
    }
}

#[derive(Debug)]
enum PendingOp {
    Send { tx: Sender<Vec<f64>>, data: Vec<f64> },
    Recv { rx: Receiver<Vec<f64>>, len: usize },
}

/// A pending request borrowed for one round of selection. Each variant
/// keeps the channel registered with the [`Select`] next to the data
/// needed to finish the operation on it.
enum Ready<'a> {
    Send(&'a Sender<Vec<f64>>, &'a mut Vec<f64>),
    Recv(&'a Receiver<Vec<f64>>, usize),
}

impl ChannelTransport {
    fn check_peer(&self, peer: WorkerId) -> Result<(), TransportError> {
        if peer.index() >= self.pool_size {
            return Err(TransportError::UnknownPeer {
                peer,
                pool_size: self.pool_size,
            });
        }
        if peer == self.rank {
            return Err(TransportError::SelfMessage { worker: peer });
        }
        Ok(())
    }

    fn sender(&self, dest: WorkerId, tag: Direction) -> Result<&Sender<Vec<f64>>, TransportError> {
        self.check_peer(dest)?;
        self.outbound
            .get(&(dest, tag))
            .ok_or(TransportError::UnknownPeer {
                peer: dest,
                pool_size: self.pool_size,
            })
    }

    fn receiver(
        &self,
        source: WorkerId,
        tag: Direction,
    ) -> Result<&Receiver<Vec<f64>>, TransportError> {
        self.check_peer(source)?;
        self.inbound
            .get(&(source, tag))
            .ok_or(TransportError::UnknownPeer {
                peer: source,
                pool_size: self.pool_size,
            })
    }
}

fn check_length(
    peer: WorkerId,
    tag: Direction,
    expected: usize,
    data: &[f64],
) -> Result<(), TransportError> {
    if data.len() != expected {
        return Err(TransportError::LengthMismatch {
            peer,
            tag,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

impl Transport for ChannelTransport {
    type Request = ChannelRequest;

    fn rank(&self) -> WorkerId {
        self.rank
    }

    fn pool_size(&self) -> usize {
        self.pool_size
    }

    fn ssend(&self, dest: WorkerId, tag: Direction, data: &[f64]) -> Result<(), TransportError> {
        let tx = self.sender(dest, tag)?;
        tracing::trace!(from = %self.rank, to = %dest, %tag, len = data.len(), "ssend");
        tx.send(data.to_vec())
            .map_err(|_| TransportError::Disconnected { peer: dest, tag })
    }

    fn recv(&self, source: WorkerId, tag: Direction, buf: &mut [f64]) -> Result<(), TransportError> {
        let rx = self.receiver(source, tag)?;
        let data = rx
            .recv()
            .map_err(|_| TransportError::Disconnected { peer: source, tag })?;
        check_length(source, tag, buf.len(), &data)?;
        tracing::trace!(at = %self.rank, from = %source, %tag, len = data.len(), "recv");
        buf.copy_from_slice(&data);
        Ok(())
    }

    fn issend(
        &self,
        dest: WorkerId,
        tag: Direction,
        data: Vec<f64>,
    ) -> Result<ChannelRequest, TransportError> {
        let tx = self.sender(dest, tag)?.clone();
        Ok(ChannelRequest {
            peer: dest,
            tag,
            op: PendingOp::Send { tx, data },
        })
    }

    fn irecv(
        &self,
        source: WorkerId,
        tag: Direction,
        len: usize,
    ) -> Result<ChannelRequest, TransportError> {
        let rx = self.receiver(source, tag)?.clone();
        Ok(ChannelRequest {
            peer: source,
            tag,
            op: PendingOp::Recv { rx, len },
        })
    }

    fn wait_all(&self, requests: Vec<ChannelRequest>) -> Result<Vec<Completion>, TransportError> {
        let mut done: Vec<Option<Completion>> = vec![None; requests.len()];
        let mut pending: Vec<(usize, ChannelRequest)> = requests.into_iter().enumerate().collect();

        while !pending.is_empty() {
            let (at, completion) = {
                let mut ready: Vec<(WorkerId, Direction, Ready<'_>)> = pending
                    .iter_mut()
                    .map(|(_, req)| {
                        let op = match &mut req.op {
                            PendingOp::Send { tx, data } => Ready::Send(&*tx, data),
                            PendingOp::Recv { rx, len } => Ready::Recv(&*rx, *len),
                        };
                        (req.peer, req.tag, op)
                    })
                    .collect();

                let mut sel = Select::new();
                for (_, _, op) in &ready {
                    match op {
                        Ready::Send(tx, _) => sel.send(*tx),
                        Ready::Recv(rx, _) => sel.recv(*rx),
                    };
                }

                let oper = sel.select();
                let at = oper.index();
                let (peer, tag, op) = ready.swap_remove(at);
                let completion = match op {
                    Ready::Send(tx, data) => {
                        oper.send(tx, std::mem::take(data))
                            .map_err(|_| TransportError::Disconnected { peer, tag })?;
                        Completion {
                            kind: OperationKind::Send,
                            peer,
                            tag,
                            data: Vec::new(),
                        }
                    }
                    Ready::Recv(rx, len) => {
                        let data = oper
                            .recv(rx)
                            .map_err(|_| TransportError::Disconnected { peer, tag })?;
                        check_length(peer, tag, len, &data)?;
                        Completion {
                            kind: OperationKind::Recv,
                            peer,
                            tag,
                            data,
                        }
                    }
                };
                (at, completion)
            };

            let (slot, _) = pending.swap_remove(at);
            tracing::trace!(
                at = %self.rank,
                peer = %completion.peer,
                tag = %completion.tag,
                kind = ?completion.kind,
                remaining = pending.len(),
                "request complete"
            );
            done[slot] = Some(completion);
        }

        Ok(done.into_iter().flatten().collect())
    }
}
