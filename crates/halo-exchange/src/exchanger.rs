//! The halo exchanger: moves boundary slabs into neighbors' ghost rings.
//!
//! A message travelling in direction `d` carries tag `d`. Sending toward
//! `d` reads the first interior slab on side `d`; receiving from `d`
//! takes tag `d.opposite()` and writes the ghost slab on side `d`.
//!
//! Transferred slabs span only the interior of the other split axis, so
//! corner ghost cells are never written: diagonal neighbors are not
//! exchanged.

use std::fmt;
use std::ops::Range;
use std::time::Instant;

use halo_core::{CellAccess, Direction, DirectionSet, MeshError, WorkerId};
use halo_space::{NeighborTopology, PartitionGeometry};
use halo_transport::{OperationKind, Transport};

use crate::context::CommContext;
use crate::error::ExchangeError;
use crate::metrics::{ExchangeMetrics, Tally};
use crate::packer::BoundaryPacker;
use crate::policy::{self, ExchangePolicy, Schedule, Step};

// ── ExchangeState ──────────────────────────────────────────────────

/// Phase of an exchange call.
///
/// `Idle → SendsIssued → ReceivesIssued → Complete → Idle`. Phases only
/// move forward within a call; entering a later phase passes through
/// the earlier ones. A successful call always ends in `Idle`. A failed
/// call leaves the exchanger in the phase it reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExchangeState {
    /// No exchange in progress.
    Idle,
    /// Outbound transfers have started.
    SendsIssued,
    /// Inbound transfers have started.
    ReceivesIssued,
    /// Every transfer has completed.
    Complete,
}

impl ExchangeState {
    fn next(self) -> Self {
        match self {
            Self::Idle => Self::SendsIssued,
            Self::SendsIssued => Self::ReceivesIssued,
            Self::ReceivesIssued => Self::Complete,
            Self::Complete => Self::Idle,
        }
    }
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::SendsIssued => "sends issued",
            Self::ReceivesIssued => "receives issued",
            Self::Complete => "complete",
        })
    }
}

// ── Slab ───────────────────────────────────────────────────────────

/// Cells moved as one message.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Slab {
    /// Part of column `x`; contiguous in storage.
    Column { x: usize, rows: Range<usize> },
    /// The packer's span of row `y`; strided in storage.
    Row { y: usize },
}

impl Slab {
    /// First interior slab on side `d`.
    fn boundary(geometry: &PartitionGeometry, d: Direction) -> Self {
        let (xs, ys) = (geometry.interior_x(), geometry.interior_y());
        match d {
            Direction::Left => Slab::Column { x: xs.start, rows: ys },
            Direction::Right => Slab::Column {
                x: xs.end - 1,
                rows: ys,
            },
            Direction::Up => Slab::Row { y: ys.start },
            Direction::Down => Slab::Row { y: ys.end - 1 },
        }
    }

    /// Ghost slab on side `d`.
    fn ghost(geometry: &PartitionGeometry, d: Direction) -> Self {
        let ys = geometry.interior_y();
        match d {
            Direction::Left => Slab::Column { x: 0, rows: ys },
            Direction::Right => Slab::Column {
                x: geometry.width() - 1,
                rows: ys,
            },
            Direction::Up => Slab::Row { y: 0 },
            Direction::Down => Slab::Row {
                y: geometry.height() - 1,
            },
        }
    }
}

// ── HaloExchanger ──────────────────────────────────────────────────

/// Refreshes one worker's ghost rings from its neighbors.
///
/// Built once per worker, usually through
/// [`ExchangeConfig::build`](crate::ExchangeConfig::build), then called
/// once per simulation step. Geometry, topology, schedule and packing
/// buffer are fixed at construction.
///
/// Every worker in the pool must call [`exchange`](Self::exchange) the
/// same number of times with the same policy; a worker that stops
/// calling leaves its neighbors blocked (or, once its transport is
/// dropped, failing with `Disconnected`).
#[derive(Debug)]
pub struct HaloExchanger {
    geometry: PartitionGeometry,
    topology: NeighborTopology,
    policy: ExchangePolicy,
    directions: usize,
    schedule: Schedule,
    active: DirectionSet,
    packer: BoundaryPacker,
    state: ExchangeState,
    poisoned: bool,
    exchanges: u64,
    last_metrics: ExchangeMetrics,
}

impl HaloExchanger {
    /// An exchanger for `geometry` with `directions` values per cell.
    pub fn new(geometry: PartitionGeometry, policy: ExchangePolicy, directions: usize) -> Self {
        let schedule = policy::blocking_schedule(policy, &geometry);
        let topology = geometry.topology();
        let active = topology.active_directions();
        let packer = BoundaryPacker::for_geometry(&geometry, directions);
        tracing::debug!(
            rank = %geometry.rank(),
            %policy,
            directions,
            active = ?active.as_slice(),
            steps = schedule.len(),
            "halo exchanger ready: {geometry}"
        );
        Self {
            topology,
            geometry,
            policy,
            directions,
            schedule,
            active,
            packer,
            state: ExchangeState::Idle,
            poisoned: false,
            exchanges: 0,
            last_metrics: ExchangeMetrics::default(),
        }
    }

    /// This worker's partition.
    pub fn geometry(&self) -> &PartitionGeometry {
        &self.geometry
    }

    /// Neighbor lookup for this worker.
    pub fn topology(&self) -> &NeighborTopology {
        &self.topology
    }

    /// Transfer ordering in use.
    pub fn policy(&self) -> ExchangePolicy {
        self.policy
    }

    /// Values per cell.
    pub fn directions_per_cell(&self) -> usize {
        self.directions
    }

    /// Directions that exchange data, in [`Direction::ALL`] order.
    pub fn active_directions(&self) -> &[Direction] {
        &self.active
    }

    /// The blocking schedule. Empty under
    /// [`ExchangePolicy::NonBlocking`].
    pub fn schedule(&self) -> &[Step] {
        &self.schedule
    }

    /// Current phase.
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Whether an earlier exchange failed part-way.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Completed exchanges so far.
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }

    /// Metrics of the most recent successful exchange.
    pub fn last_metrics(&self) -> &ExchangeMetrics {
        &self.last_metrics
    }

    /// Refresh every active ghost slab of `mesh` from the neighbors.
    ///
    /// Blocks until all of this worker's transfers have completed. On
    /// `Ok`, each active-direction ghost slab holds the neighbor's
    /// current boundary; inactive ghost slabs and corners are untouched.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::ShapeMismatch`] and
    /// [`ExchangeError::ContextMismatch`] are reported before any
    /// transfer. A transport or mesh failure part-way through poisons
    /// the exchanger and every later call returns
    /// [`ExchangeError::Poisoned`].
    pub fn exchange<T, M>(
        &mut self,
        ctx: &CommContext<T>,
        mesh: &mut M,
    ) -> Result<ExchangeMetrics, ExchangeError>
    where
        T: Transport,
        M: CellAccess + ?Sized,
    {
        if self.poisoned {
            return Err(ExchangeError::Poisoned { state: self.state });
        }
        self.check_context(ctx)?;
        self.check_shape(mesh)?;

        let start = Instant::now();
        let mut tally = Tally::default();
        if let Err(e) = self.run(ctx.transport(), mesh, &mut tally) {
            self.poisoned = true;
            tracing::warn!(
                rank = %self.geometry.rank(),
                state = %self.state,
                error = %e,
                "halo exchange failed, exchanger poisoned"
            );
            return Err(e);
        }

        self.exchanges += 1;
        let metrics = tally.finish(start.elapsed(), self.exchanges);
        self.last_metrics = metrics.clone();
        self.enter_next();
        tracing::trace!(
            rank = %self.geometry.rank(),
            exchange = self.exchanges,
            total_us = metrics.total_us,
            wait_us = metrics.wait_us,
            sent = metrics.messages_sent,
            received = metrics.messages_received,
            "halo exchange complete"
        );
        Ok(metrics)
    }

    fn check_context<T: Transport>(&self, ctx: &CommContext<T>) -> Result<(), ExchangeError> {
        let expected = (self.geometry.rank(), self.geometry.pool_size());
        let actual = (ctx.rank(), ctx.pool_size());
        if expected != actual {
            return Err(ExchangeError::ContextMismatch { expected, actual });
        }
        Ok(())
    }

    fn check_shape<M: CellAccess + ?Sized>(&self, mesh: &M) -> Result<(), ExchangeError> {
        let expected = (self.geometry.width(), self.geometry.height(), self.directions);
        let actual = (mesh.width(), mesh.height(), mesh.directions());
        if expected != actual {
            return Err(ExchangeError::ShapeMismatch { expected, actual });
        }
        Ok(())
    }

    fn enter_next(&mut self) {
        let next = self.state.next();
        tracing::trace!(rank = %self.geometry.rank(), from = %self.state, to = %next, "exchange state");
        self.state = next;
    }

    /// Move forward to `target`, passing through intermediate phases.
    fn advance_to(&mut self, target: ExchangeState) {
        while self.state < target {
            self.enter_next();
        }
    }

    fn run<T, M>(&mut self, transport: &T, mesh: &mut M, tally: &mut Tally) -> Result<(), ExchangeError>
    where
        T: Transport,
        M: CellAccess + ?Sized,
    {
        if self.policy.is_nonblocking() {
            self.run_nonblocking(transport, mesh, tally)?;
        } else {
            self.run_blocking(transport, mesh, tally)?;
        }
        self.advance_to(ExchangeState::Complete);
        Ok(())
    }

    fn run_blocking<T, M>(
        &mut self,
        transport: &T,
        mesh: &mut M,
        tally: &mut Tally,
    ) -> Result<(), ExchangeError>
    where
        T: Transport,
        M: CellAccess + ?Sized,
    {
        let schedule = self.schedule.clone();
        for step in schedule {
            match step {
                Step::Send(d) => {
                    let Some(peer) = self.topology.neighbor(d) else { continue };
                    self.advance_to(ExchangeState::SendsIssued);
                    self.send_blocking(transport, mesh, peer, d, tally)?;
                }
                Step::Recv(d) => {
                    let Some(peer) = self.topology.neighbor(d) else { continue };
                    self.advance_to(ExchangeState::ReceivesIssued);
                    self.recv_blocking(transport, mesh, peer, d, tally)?;
                }
            }
        }
        Ok(())
    }

    fn send_blocking<T, M>(
        &mut self,
        transport: &T,
        mesh: &M,
        peer: WorkerId,
        d: Direction,
        tally: &mut Tally,
    ) -> Result<(), ExchangeError>
    where
        T: Transport,
        M: CellAccess + ?Sized,
    {
        let data = match Slab::boundary(&self.geometry, d) {
            Slab::Column { x, rows } => mesh.column(x, rows)?,
            Slab::Row { y } => {
                let t = Instant::now();
                let packed = self.packer.pack(mesh, y)?;
                tally.pack += t.elapsed();
                packed
            }
        };
        let t = Instant::now();
        transport.ssend(peer, d, data)?;
        tally.wait += t.elapsed();
        tally.sent(data.len());
        tracing::trace!(rank = %self.geometry.rank(), to = %peer, tag = %d, len = data.len(), "boundary sent");
        Ok(())
    }

    fn recv_blocking<T, M>(
        &mut self,
        transport: &T,
        mesh: &mut M,
        peer: WorkerId,
        d: Direction,
        tally: &mut Tally,
    ) -> Result<(), ExchangeError>
    where
        T: Transport,
        M: CellAccess + ?Sized,
    {
        let tag = d.opposite();
        let len = match Slab::ghost(&self.geometry, d) {
            Slab::Column { x, rows } => {
                let ghost = mesh.column_mut(x, rows)?;
                let t = Instant::now();
                transport.recv(peer, tag, ghost)?;
                tally.wait += t.elapsed();
                ghost.len()
            }
            Slab::Row { y } => {
                let t = Instant::now();
                transport.recv(peer, tag, self.packer.buffer_mut())?;
                tally.wait += t.elapsed();
                let t = Instant::now();
                self.packer.unpack(mesh, y)?;
                tally.pack += t.elapsed();
                self.packer.len()
            }
        };
        tally.received(len);
        tracing::trace!(rank = %self.geometry.rank(), from = %peer, %tag, len, "ghost received");
        Ok(())
    }

    fn run_nonblocking<T, M>(
        &mut self,
        transport: &T,
        mesh: &mut M,
        tally: &mut Tally,
    ) -> Result<(), ExchangeError>
    where
        T: Transport,
        M: CellAccess + ?Sized,
    {
        let mut requests = Vec::with_capacity(self.active.len() * 2);

        for &d in &self.active {
            let Some(peer) = self.topology.neighbor(d) else { continue };
            let t = Instant::now();
            let data = self.boundary_owned(mesh, d)?;
            tally.pack += t.elapsed();
            tally.sent(data.len());
            requests.push(transport.issend(peer, d, data)?);
        }
        self.advance_to(ExchangeState::SendsIssued);

        for &d in &self.active {
            let Some(peer) = self.topology.neighbor(d) else { continue };
            let len = self.slab_len(&Slab::ghost(&self.geometry, d));
            requests.push(transport.irecv(peer, d.opposite(), len)?);
        }
        self.advance_to(ExchangeState::ReceivesIssued);

        let t = Instant::now();
        let completions = transport.wait_all(requests)?;
        tally.wait += t.elapsed();
        self.advance_to(ExchangeState::Complete);

        for c in completions {
            if c.kind != OperationKind::Recv {
                continue;
            }
            let t = Instant::now();
            self.write_ghost(mesh, c.tag.opposite(), &c.data)?;
            tally.pack += t.elapsed();
            tally.received(c.data.len());
        }
        Ok(())
    }

    fn boundary_owned<M: CellAccess + ?Sized>(&self, mesh: &M, d: Direction) -> Result<Vec<f64>, MeshError> {
        match Slab::boundary(&self.geometry, d) {
            Slab::Column { x, rows } => Ok(mesh.column(x, rows)?.to_vec()),
            Slab::Row { y } => self.packer.pack_owned(mesh, y),
        }
    }

    fn write_ghost<M: CellAccess + ?Sized>(
        &self,
        mesh: &mut M,
        d: Direction,
        data: &[f64],
    ) -> Result<(), MeshError> {
        match Slab::ghost(&self.geometry, d) {
            Slab::Column { x, rows } => {
                let ghost = mesh.column_mut(x, rows)?;
                if ghost.len() != data.len() {
                    return Err(MeshError::BufferLength {
                        expected: ghost.len(),
                        actual: data.len(),
                    });
                }
                ghost.copy_from_slice(data);
                Ok(())
            }
            Slab::Row { y } => self.packer.unpack_from(mesh, y, data),
        }
    }

    fn slab_len(&self, slab: &Slab) -> usize {
        match slab {
            Slab::Column { rows, .. } => rows.len() * self.directions,
            Slab::Row { .. } => self.packer.len(),
        }
    }
}
