//! Synthetic meshes and halo verification.
//!
//! Every interior cell of the global mesh gets a distinct value derived
//! from its global coordinate, and every ghost cell starts at
//! [`GHOST_SENTINEL`]. After a correct exchange a ghost cell facing a
//! neighbor holds the synthetic value of the global cell it mirrors;
//! ghost cells at the domain border and corner ghosts still hold the
//! sentinel.

use std::fmt;

use halo_core::{Axis, CellAccess, Direction};
use halo_space::{LocalMesh, PartitionGeometry};

/// Initial value of every ghost cell.
pub const GHOST_SENTINEL: f64 = -1.0;

/// Value of direction `k` of global cell `(gx, gy)`. Distinct for
/// `k < 100` and meshes up to 10 000 cells high.
pub fn synthetic_value(gx: usize, gy: usize, k: usize) -> f64 {
    ((gx * 10_000 + gy) * 100 + k) as f64
}

/// Storage for `geometry` with synthetic interior values and sentinel
/// ghosts.
pub fn synthetic_mesh(geometry: &PartitionGeometry, directions: usize) -> LocalMesh {
    let mut mesh = LocalMesh::for_geometry(geometry, directions)
        .unwrap_or_else(|e| panic!("cannot allocate mesh for {geometry}: {e}"));
    mesh.fill_with(|x, y, k| match geometry.to_global(x, y) {
        Some((gx, gy)) => synthetic_value(gx, gy, k),
        None => GHOST_SENTINEL,
    });
    mesh
}

/// First cell whose post-exchange value is wrong.
#[derive(Clone, Debug, PartialEq)]
pub struct HaloMismatch {
    pub x: usize,
    pub y: usize,
    pub k: usize,
    pub expected: f64,
    pub actual: f64,
}

impl fmt::Display for HaloMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cell ({}, {}) direction {}: expected {}, found {}",
            self.x, self.y, self.k, self.expected, self.actual
        )
    }
}

/// Global coordinate mirrored by local cell `(x, y)`, counting ghost
/// cells as the neighbor cells they stand in for. `None` off the mesh.
fn mirrored_global(geometry: &PartitionGeometry, x: usize, y: usize) -> Option<(usize, usize)> {
    let gx = (geometry.origin_x() + x).checked_sub(geometry.ghost_offset(Axis::X))?;
    let gy = (geometry.origin_y() + y).checked_sub(geometry.ghost_offset(Axis::Y))?;
    Some((gx, gy))
}

/// The ghost side `(x, y)` sits on, or `None` for interior cells and
/// corner ghosts.
fn ghost_side(geometry: &PartitionGeometry, x: usize, y: usize) -> Option<Direction> {
    let in_x = geometry.interior_x().contains(&x);
    let in_y = geometry.interior_y().contains(&y);
    match (in_x, in_y) {
        (false, true) if x == 0 => Some(Direction::Left),
        (false, true) => Some(Direction::Right),
        (true, false) if y == 0 => Some(Direction::Up),
        (true, false) => Some(Direction::Down),
        _ => None,
    }
}

/// Expected value of direction `k` of local cell `(x, y)` after one
/// exchange of a [`synthetic_mesh`].
pub fn expected_value(geometry: &PartitionGeometry, x: usize, y: usize, k: usize) -> f64 {
    if let Some((gx, gy)) = geometry.to_global(x, y) {
        return synthetic_value(gx, gy, k);
    }
    let facing_neighbor = ghost_side(geometry, x, y)
        .is_some_and(|d| geometry.topology().neighbor(d).is_some());
    match mirrored_global(geometry, x, y) {
        Some((gx, gy)) if facing_neighbor => synthetic_value(gx, gy, k),
        _ => GHOST_SENTINEL,
    }
}

/// Check every cell of `mesh` against [`expected_value`].
pub fn verify_halo<M: CellAccess + ?Sized>(
    geometry: &PartitionGeometry,
    mesh: &M,
) -> Result<(), HaloMismatch> {
    for x in 0..mesh.width() {
        for y in 0..mesh.height() {
            let cell = mesh
                .cell(x, y)
                .unwrap_or_else(|e| panic!("mesh does not match {geometry}: {e}"));
            for (k, &actual) in cell.iter().enumerate() {
                let expected = expected_value(geometry, x, y, k);
                if actual != expected {
                    return Err(HaloMismatch {
                        x,
                        y,
                        k,
                        expected,
                        actual,
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_values_are_distinct() {
        assert_ne!(synthetic_value(1, 0, 0), synthetic_value(0, 1, 0));
        assert_ne!(synthetic_value(0, 0, 1), synthetic_value(0, 1, 0));
    }

    #[test]
    fn fresh_mesh_has_sentinel_ghosts() {
        let g = PartitionGeometry::compute_2d(8, 6, 0, 4).unwrap();
        let m = synthetic_mesh(&g, 3);
        assert_eq!(m.cell(0, 2).unwrap(), &[GHOST_SENTINEL; 3]);
        assert_eq!(m.cell(1, 1).unwrap()[0], synthetic_value(0, 0, 0));
    }

    #[test]
    fn unexchanged_mesh_fails_only_where_neighbors_exist() {
        // Rank 0 of two strips has a right neighbor only.
        let g = PartitionGeometry::compute_1d(8, 3, 0, 2).unwrap();
        let m = synthetic_mesh(&g, 1);
        let err = verify_halo(&g, &m).unwrap_err();
        assert_eq!((err.x, err.y), (g.width() - 1, 0));
        assert_eq!(err.expected, synthetic_value(4, 0, 0));
        assert_eq!(err.actual, GHOST_SENTINEL);
    }

    #[test]
    fn lone_worker_verifies_untouched() {
        let g = PartitionGeometry::compute_1d(5, 4, 0, 1).unwrap();
        let m = synthetic_mesh(&g, 2);
        assert_eq!(verify_halo(&g, &m), Ok(()));
    }

    #[test]
    fn corners_expect_the_sentinel() {
        let g = PartitionGeometry::compute_2d(8, 8, 3, 4).unwrap();
        assert_eq!(expected_value(&g, 0, 0, 0), GHOST_SENTINEL);
        assert_eq!(ghost_side(&g, 0, 0), None);
        assert_eq!(ghost_side(&g, 0, 1), Some(Direction::Left));
        // Left ghost of (1, 1) mirrors global column 3.
        assert_eq!(expected_value(&g, 0, 1, 0), synthetic_value(3, 4, 0));
    }
}
