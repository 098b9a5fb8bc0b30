//! Per-worker partition geometry.
//!
//! [`PartitionGeometry`] is computed once at startup from the global
//! mesh extents, the worker's rank and the pool size. It is immutable
//! afterwards and answers every sizing question the compute and
//! exchange layers ask: local extents (ghosts included), interior
//! index ranges, partition-grid coordinates and the global origin.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use halo_core::{Axis, WorkerId};

use crate::error::GeometryError;
use crate::topology::NeighborTopology;

/// How the global mesh is divided among workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    /// Split along X only, one vertical strip per worker. Y stays whole
    /// because columns are contiguous in storage.
    #[default]
    Split1D,
    /// Split along X into `pool_size / 2` columns and along Y into two
    /// rows of partitions. Requires an even pool size.
    Split2D,
}

impl Layout {
    /// Short name used in configuration text.
    pub fn name(self) -> &'static str {
        match self {
            Layout::Split1D => "1d",
            Layout::Split2D => "2d",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1d" | "split1d" => Ok(Layout::Split1D),
            "2d" | "split2d" => Ok(Layout::Split2D),
            other => Err(format!("unknown layout '{other}', expected '1d' or '2d'")),
        }
    }
}

/// A worker's rectangle of the global mesh.
///
/// Along every split axis the local extent carries one ghost cell on
/// each side; along an unsplit axis the extent equals the global one.
/// The partition at the maximum coordinate of a split axis absorbs the
/// remainder of the integer division, so the interiors of all
/// partitions along an axis tile the global extent exactly once.
///
/// # Examples
///
/// ```
/// use halo_space::PartitionGeometry;
///
/// // 10 columns over 3 workers: interiors 3, 3, 4.
/// let last = PartitionGeometry::compute_1d(10, 6, 2, 3).unwrap();
/// assert_eq!(last.width(), 4 + 2);
/// assert_eq!(last.height(), 6);
/// assert_eq!(last.origin_x(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionGeometry {
    layout: Layout,
    partitions_x: usize,
    partitions_y: usize,
    coord_x: usize,
    coord_y: usize,
    width: usize,
    height: usize,
    origin_x: usize,
    origin_y: usize,
}

/// Local extent (ghosts included) and global origin of partition
/// `coord` along one split axis.
fn split_axis(total: usize, partitions: usize, coord: usize) -> (usize, usize) {
    let base = total / partitions;
    let mut extent = base + 2;
    if coord == partitions - 1 {
        extent += total % partitions;
    }
    (extent, coord * base)
}

fn check_split(axis: Axis, total: usize, partitions: usize) -> Result<(), GeometryError> {
    if total == 0 {
        return Err(GeometryError::EmptyDomain { axis });
    }
    if total < partitions {
        return Err(GeometryError::DomainTooSmall {
            axis,
            total,
            partitions,
        });
    }
    Ok(())
}

impl PartitionGeometry {
    /// Strip decomposition along X.
    ///
    /// `partitions_x = pool_size`, `partitions_y = 1`, `coord_x = rank`.
    pub fn compute_1d(
        total_width: usize,
        total_height: usize,
        rank: usize,
        pool_size: usize,
    ) -> Result<Self, GeometryError> {
        if pool_size == 0 {
            return Err(GeometryError::EmptyPool);
        }
        if rank >= pool_size {
            return Err(GeometryError::RankOutOfRange { rank, pool_size });
        }
        check_split(Axis::X, total_width, pool_size)?;
        if total_height == 0 {
            return Err(GeometryError::EmptyDomain { axis: Axis::Y });
        }

        let (width, origin_x) = split_axis(total_width, pool_size, rank);
        let geometry = Self {
            layout: Layout::Split1D,
            partitions_x: pool_size,
            partitions_y: 1,
            coord_x: rank,
            coord_y: 0,
            width,
            height: total_height,
            origin_x,
            origin_y: 0,
        };
        geometry.trace_computed();
        Ok(geometry)
    }

    /// Two-row decomposition: `pool_size / 2` partitions along X, two
    /// along Y, ranks assigned row-major over the partition grid.
    pub fn compute_2d(
        total_width: usize,
        total_height: usize,
        rank: usize,
        pool_size: usize,
    ) -> Result<Self, GeometryError> {
        if pool_size == 0 {
            return Err(GeometryError::EmptyPool);
        }
        if pool_size % 2 != 0 {
            return Err(GeometryError::OddPool { pool_size });
        }
        if rank >= pool_size {
            return Err(GeometryError::RankOutOfRange { rank, pool_size });
        }
        let partitions_x = pool_size / 2;
        let partitions_y = 2;
        check_split(Axis::X, total_width, partitions_x)?;
        check_split(Axis::Y, total_height, partitions_y)?;

        let coord_x = rank % partitions_x;
        let coord_y = rank / partitions_x;
        let (width, origin_x) = split_axis(total_width, partitions_x, coord_x);
        let (height, origin_y) = split_axis(total_height, partitions_y, coord_y);
        let geometry = Self {
            layout: Layout::Split2D,
            partitions_x,
            partitions_y,
            coord_x,
            coord_y,
            width,
            height,
            origin_x,
            origin_y,
        };
        geometry.trace_computed();
        Ok(geometry)
    }

    /// Dispatch on `layout`.
    pub fn compute(
        layout: Layout,
        total_width: usize,
        total_height: usize,
        rank: usize,
        pool_size: usize,
    ) -> Result<Self, GeometryError> {
        match layout {
            Layout::Split1D => Self::compute_1d(total_width, total_height, rank, pool_size),
            Layout::Split2D => Self::compute_2d(total_width, total_height, rank, pool_size),
        }
    }

    fn trace_computed(&self) {
        tracing::debug!(
            layout = %self.layout,
            rank = self.rank().index(),
            partitions_x = self.partitions_x,
            partitions_y = self.partitions_y,
            coord_x = self.coord_x,
            coord_y = self.coord_y,
            width = self.width,
            height = self.height,
            origin_x = self.origin_x,
            origin_y = self.origin_y,
            "partition geometry computed"
        );
    }

    /// The decomposition this geometry belongs to.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Partitions along X.
    pub fn partitions_x(&self) -> usize {
        self.partitions_x
    }

    /// Partitions along Y.
    pub fn partitions_y(&self) -> usize {
        self.partitions_y
    }

    /// This worker's partition-grid X coordinate.
    pub fn coord_x(&self) -> usize {
        self.coord_x
    }

    /// This worker's partition-grid Y coordinate.
    pub fn coord_y(&self) -> usize {
        self.coord_y
    }

    /// Local width, ghost columns included.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Local height, ghost rows included when Y is split.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Global X of the first interior column.
    pub fn origin_x(&self) -> usize {
        self.origin_x
    }

    /// Global Y of the first interior row.
    pub fn origin_y(&self) -> usize {
        self.origin_y
    }

    /// Total number of workers in the partition grid.
    pub fn pool_size(&self) -> usize {
        self.partitions_x * self.partitions_y
    }

    /// This worker's linear identifier.
    pub fn rank(&self) -> WorkerId {
        WorkerId(self.coord_y * self.partitions_x + self.coord_x)
    }

    /// Whether the global mesh is divided along `axis`.
    ///
    /// X is always split; Y only under [`Layout::Split2D`].
    pub fn is_split(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => true,
            Axis::Y => self.layout == Layout::Split2D,
        }
    }

    /// Ghost cells on each side of `axis`: 1 when split, 0 otherwise.
    pub fn ghost_offset(&self, axis: Axis) -> usize {
        usize::from(self.is_split(axis))
    }

    /// Owned columns, excluding ghosts.
    pub fn interior_width(&self) -> usize {
        self.width - 2 * self.ghost_offset(Axis::X)
    }

    /// Owned rows, excluding ghosts.
    pub fn interior_height(&self) -> usize {
        self.height - 2 * self.ghost_offset(Axis::Y)
    }

    /// Local X indices of interior columns.
    pub fn interior_x(&self) -> Range<usize> {
        let g = self.ghost_offset(Axis::X);
        g..self.width - g
    }

    /// Local Y indices of interior rows.
    pub fn interior_y(&self) -> Range<usize> {
        let g = self.ghost_offset(Axis::Y);
        g..self.height - g
    }

    /// Global coordinate of local cell `(x, y)`, or `None` for ghost cells.
    pub fn to_global(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        if !self.interior_x().contains(&x) || !self.interior_y().contains(&y) {
            return None;
        }
        Some((
            self.origin_x + x - self.ghost_offset(Axis::X),
            self.origin_y + y - self.ghost_offset(Axis::Y),
        ))
    }

    /// Neighbor lookup for this partition.
    pub fn topology(&self) -> NeighborTopology {
        NeighborTopology::new(
            self.partitions_x,
            self.partitions_y,
            self.coord_x,
            self.coord_y,
        )
    }
}

impl fmt::Display for PartitionGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rank {} [{}] grid {}x{} at ({}, {}): local {}x{}, origin ({}, {})",
            self.rank(),
            self.layout,
            self.partitions_x,
            self.partitions_y,
            self.coord_x,
            self.coord_y,
            self.width,
            self.height,
            self.origin_x,
            self.origin_y,
        )
    }
}
