//! Error types for partition geometry construction.

use halo_core::Axis;
use std::fmt;

/// Configuration errors detected while computing a partition geometry.
///
/// Each variant names the offending parameter. These are contract
/// violations by the caller; nothing is retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeometryError {
    /// `pool_size` is zero.
    EmptyPool,
    /// The two-row layout needs an even `pool_size`.
    OddPool {
        /// The configured pool size.
        pool_size: usize,
    },
    /// `rank` is not below `pool_size`.
    RankOutOfRange {
        /// The offending rank.
        rank: usize,
        /// The configured pool size.
        pool_size: usize,
    },
    /// A total mesh extent is zero.
    EmptyDomain {
        /// Axis with the zero extent.
        axis: Axis,
    },
    /// A split axis has fewer cells than partitions, which would leave
    /// some partition without interior cells.
    DomainTooSmall {
        /// The split axis.
        axis: Axis,
        /// Total cells along the axis.
        total: usize,
        /// Partitions along the axis.
        partitions: usize,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPool => write!(f, "pool_size must be at least 1"),
            Self::OddPool { pool_size } => {
                write!(f, "pool_size must be even for the 2D layout, got {pool_size}")
            }
            Self::RankOutOfRange { rank, pool_size } => {
                write!(f, "rank {rank} out of range for pool_size {pool_size}")
            }
            Self::EmptyDomain { axis } => {
                write!(f, "total extent along {axis} must be at least 1")
            }
            Self::DomainTooSmall {
                axis,
                total,
                partitions,
            } => write!(
                f,
                "total extent {total} along {axis} cannot be split into {partitions} partitions"
            ),
        }
    }
}

impl std::error::Error for GeometryError {}
