//! Neighbor lookup on the partition grid.

use halo_core::{Direction, DirectionSet, WorkerId};

/// Maps a direction to the neighboring partition's worker identifier.
///
/// The partition grid has absorbing edges: stepping off the grid yields
/// `None`, the "no neighbor" sentinel. The exchanger treats `None` as
/// the sole signal to skip a direction, so a worker never sends toward
/// or receives from a domain border.
///
/// # Examples
///
/// ```
/// use halo_core::{Direction, WorkerId};
/// use halo_space::PartitionGeometry;
///
/// // Rank 4 of 6 sits in the middle of a 3x2 grid, bottom row.
/// let topo = PartitionGeometry::compute_2d(9, 4, 4, 6).unwrap().topology();
/// assert_eq!(topo.neighbor(Direction::Left), Some(WorkerId(3)));
/// assert_eq!(topo.neighbor(Direction::Up), Some(WorkerId(1)));
/// assert_eq!(topo.neighbor(Direction::Down), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborTopology {
    partitions_x: usize,
    partitions_y: usize,
    coord_x: usize,
    coord_y: usize,
}

/// Move `coord` by `delta` on an axis of length `len`, or `None` when
/// the result leaves `[0, len)`.
fn step_axis(coord: usize, delta: isize, len: usize) -> Option<usize> {
    let next = coord.checked_add_signed(delta)?;
    (next < len).then_some(next)
}

impl NeighborTopology {
    /// Topology of the partition at `(coord_x, coord_y)` on a
    /// `partitions_x × partitions_y` grid. Only built from a validated
    /// [`PartitionGeometry`](crate::PartitionGeometry).
    pub(crate) fn new(partitions_x: usize, partitions_y: usize, coord_x: usize, coord_y: usize) -> Self {
        debug_assert!(coord_x < partitions_x && coord_y < partitions_y);
        Self {
            partitions_x,
            partitions_y,
            coord_x,
            coord_y,
        }
    }

    /// Row-major linear identifier of partition `(cx, cy)`.
    pub fn linear_id(&self, cx: usize, cy: usize) -> WorkerId {
        WorkerId(cy * self.partitions_x + cx)
    }

    /// This partition's identifier.
    pub fn self_id(&self) -> WorkerId {
        self.linear_id(self.coord_x, self.coord_y)
    }

    /// The neighbor in `direction`, or `None` at the domain border.
    pub fn neighbor(&self, direction: Direction) -> Option<WorkerId> {
        let (dx, dy) = direction.offset();
        let cx = step_axis(self.coord_x, dx, self.partitions_x)?;
        let cy = step_axis(self.coord_y, dy, self.partitions_y)?;
        Some(self.linear_id(cx, cy))
    }

    /// Whether `direction` points at the domain border.
    pub fn is_border(&self, direction: Direction) -> bool {
        self.neighbor(direction).is_none()
    }

    /// Directions that have a neighbor, in [`Direction::ALL`] order.
    pub fn active_directions(&self) -> DirectionSet {
        Direction::ALL
            .into_iter()
            .filter(|&d| !self.is_border(d))
            .collect()
    }
}
