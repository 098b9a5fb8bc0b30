use halo_core::{Axis, CellAccess, Direction};
use halo_space::{GeometryError, Layout, LocalMesh, PartitionGeometry};
use proptest::prelude::*;

fn all(layout: Layout, w: usize, h: usize, pool: usize) -> Vec<PartitionGeometry> {
    (0..pool)
        .map(|r| PartitionGeometry::compute(layout, w, h, r, pool).unwrap())
        .collect()
}

#[test]
fn exercise_sized_strips() {
    // 800x160 over 3 workers: 266, 266, 268 interior columns.
    let parts = all(Layout::Split1D, 800, 160, 3);
    let widths: Vec<_> = parts.iter().map(|g| g.interior_width()).collect();
    assert_eq!(widths, vec![266, 266, 268]);
    assert_eq!(parts[2].origin_x(), 532);
    assert!(parts.iter().all(|g| g.height() == 160));
}

#[test]
fn grid_needs_an_even_pool() {
    assert_eq!(
        PartitionGeometry::compute_2d(10, 10, 0, 5),
        Err(GeometryError::OddPool { pool_size: 5 })
    );
    assert_eq!(
        PartitionGeometry::compute_1d(10, 10, 0, 0),
        Err(GeometryError::EmptyPool)
    );
}

#[test]
fn mesh_matches_geometry_with_ghosts() {
    let g = PartitionGeometry::compute_2d(20, 9, 5, 6).unwrap();
    let m = LocalMesh::for_geometry(&g, 9).unwrap();
    // 20 / 3 = 6 (+2 remainder on the last column), 9 / 2 = 4 (+1 on the last row).
    assert_eq!((m.width(), m.height()), (10, 7));
    assert_eq!(g.interior_x(), 1..9);
    assert_eq!(g.interior_y(), 1..6);
    assert!(g.topology().is_border(Direction::Right));
    assert!(g.topology().is_border(Direction::Down));
}

proptest! {
    #[test]
    fn interiors_tile_each_axis(w in 1usize..200, h in 2usize..200, half in 1usize..6) {
        let pool = half * 2;
        prop_assume!(w >= half);

        let strips = all(Layout::Split1D, w.max(pool), h, pool);
        let total: usize = strips.iter().map(|g| g.interior_width()).sum();
        prop_assert_eq!(total, w.max(pool));

        let grid = all(Layout::Split2D, w, h, pool);
        let cols: usize = grid.iter().filter(|g| g.coord_y() == 0).map(|g| g.interior_width()).sum();
        let rows: usize = grid.iter().filter(|g| g.coord_x() == 0).map(|g| g.interior_height()).sum();
        prop_assert_eq!(cols, w);
        prop_assert_eq!(rows, h);
        prop_assert!(grid.iter().all(|g| g.ghost_offset(Axis::Y) == 1));
    }

    #[test]
    fn origins_are_contiguous(w in 1usize..300, pool in 1usize..12) {
        prop_assume!(w >= pool);
        let strips = all(Layout::Split1D, w, 3, pool);
        for pair in strips.windows(2) {
            prop_assert_eq!(pair[0].origin_x() + pair[0].interior_width(), pair[1].origin_x());
        }
    }
}
