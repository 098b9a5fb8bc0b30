//! Partition geometry and local storage for halo exchange.
//!
//! This crate answers the spatial questions of a decomposed mesh:
//! which rectangle of the global mesh a worker owns, who its
//! neighbors are, and how its cells are laid out in memory.
//!
//! # Components
//!
//! - [`PartitionGeometry`]: sub-grid extents, partition-grid coordinates
//!   and global origin for one worker, for either [`Layout`].
//! - [`NeighborTopology`]: maps a [`Direction`](halo_core::Direction) to
//!   the neighbor's [`WorkerId`](halo_core::WorkerId), or `None` at the
//!   domain border.
//! - [`LocalMesh`]: reference column-major cell storage implementing
//!   [`CellAccess`](halo_core::CellAccess).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod mesh;
pub mod topology;

#[cfg(test)]
pub(crate) mod compliance;

pub use error::GeometryError;
pub use geometry::{Layout, PartitionGeometry};
pub use mesh::LocalMesh;
pub use topology::NeighborTopology;
