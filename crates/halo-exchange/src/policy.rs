//! Exchange scheduling policies.
//!
//! A blocking policy is a fixed sequence of [`Step`]s per worker. The
//! sequence depends only on the worker's partition coordinates, and
//! inactive (border) directions are dropped from it up front, so the
//! exchanger runs every blocking policy through one executor.

use std::fmt;
use std::str::FromStr;

use halo_core::{Axis, Direction};
use halo_space::{NeighborTopology, PartitionGeometry};
use smallvec::SmallVec;

/// How a worker orders its boundary transfers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExchangePolicy {
    /// Blocking transfers ordered by coordinate parity along each axis:
    /// odd workers send first, even workers receive first.
    #[default]
    ParityBlocking,
    /// Every transfer is issued without blocking, then completed by one
    /// combined wait.
    NonBlocking,
    /// Blocking shift pattern: send one way, receive from the other,
    /// then reverse. Rows go through the boundary packer.
    FourNeighbor,
}

impl ExchangePolicy {
    /// All policies.
    pub const ALL: [ExchangePolicy; 3] = [
        ExchangePolicy::ParityBlocking,
        ExchangePolicy::NonBlocking,
        ExchangePolicy::FourNeighbor,
    ];

    /// Short name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            ExchangePolicy::ParityBlocking => "parity",
            ExchangePolicy::NonBlocking => "nonblocking",
            ExchangePolicy::FourNeighbor => "four-neighbor",
        }
    }

    /// Whether transfers are issued without blocking.
    pub fn is_nonblocking(self) -> bool {
        self == ExchangePolicy::NonBlocking
    }
}

impl fmt::Display for ExchangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExchangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parity" | "parity-blocking" => Ok(ExchangePolicy::ParityBlocking),
            "nonblocking" | "non-blocking" => Ok(ExchangePolicy::NonBlocking),
            "four-neighbor" | "four-neighbour" | "4n" => Ok(ExchangePolicy::FourNeighbor),
            other => Err(format!(
                "unknown exchange policy '{other}', expected parity, nonblocking or four-neighbor"
            )),
        }
    }
}

/// One blocking transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Send the boundary slab on this side to the neighbor there.
    Send(Direction),
    /// Receive the neighbor's boundary into the ghost slab on this side.
    Recv(Direction),
}

/// An ordered list of blocking transfers.
pub type Schedule = SmallVec<[Step; 8]>;

/// Axes that carry transfers for `geometry`, X first.
fn split_axes(geometry: &PartitionGeometry) -> SmallVec<[Axis; 2]> {
    [Axis::X, Axis::Y]
        .into_iter()
        .filter(|&a| geometry.is_split(a))
        .collect()
}

fn axis_coord(geometry: &PartitionGeometry, axis: Axis) -> usize {
    match axis {
        Axis::X => geometry.coord_x(),
        Axis::Y => geometry.coord_y(),
    }
}

/// Parity ordering for one axis.
///
/// Odd: send backward, send forward, receive forward, receive backward.
/// Even: receive forward, receive backward, send backward, send forward.
/// Every send from an odd worker meets an even worker that is already
/// receiving, and vice versa, so no cycle of blocked sends can form.
fn parity_axis(coord: usize, axis: Axis) -> [Step; 4] {
    let [back, fwd] = axis.directions();
    if coord % 2 == 1 {
        [Step::Send(back), Step::Send(fwd), Step::Recv(fwd), Step::Recv(back)]
    } else {
        [Step::Recv(fwd), Step::Recv(back), Step::Send(back), Step::Send(fwd)]
    }
}

/// Shift ordering for one axis. The chain unblocks from the border
/// worker, which has nothing to send backward.
fn shift_axis(axis: Axis) -> [Step; 4] {
    let [back, fwd] = axis.directions();
    [Step::Send(back), Step::Recv(fwd), Step::Send(fwd), Step::Recv(back)]
}

/// The blocking schedule for `policy` on `geometry`, border directions
/// removed. Empty for [`ExchangePolicy::NonBlocking`].
pub fn blocking_schedule(policy: ExchangePolicy, geometry: &PartitionGeometry) -> Schedule {
    let topology = geometry.topology();
    let mut schedule = Schedule::new();
    for axis in split_axes(geometry) {
        let steps = match policy {
            ExchangePolicy::ParityBlocking => parity_axis(axis_coord(geometry, axis), axis),
            ExchangePolicy::FourNeighbor => shift_axis(axis),
            ExchangePolicy::NonBlocking => continue,
        };
        schedule.extend(steps.into_iter().filter(|s| is_active(&topology, *s)));
    }
    schedule
}

fn is_active(topology: &NeighborTopology, step: Step) -> bool {
    match step {
        Step::Send(d) | Step::Recv(d) => !topology.is_border(d),
    }
}
