//! Decomposition compliance test helpers.
//!
//! These functions compute the geometry of every worker in a pool and
//! verify the invariants the exchange layer relies on. Reused by the
//! geometry and topology test modules.

use crate::geometry::{Layout, PartitionGeometry};
use halo_core::{Direction, WorkerId};
use indexmap::IndexMap;

/// Geometry of every rank in the pool, in rank order.
pub fn all_geometries(
    layout: Layout,
    total_width: usize,
    total_height: usize,
    pool_size: usize,
) -> Vec<PartitionGeometry> {
    (0..pool_size)
        .map(|rank| {
            PartitionGeometry::compute(layout, total_width, total_height, rank, pool_size)
                .unwrap_or_else(|e| panic!("rank {rank}: {e}"))
        })
        .collect()
}

/// Assert that every global cell is owned by exactly one partition.
pub fn assert_cells_owned_once(parts: &[PartitionGeometry], total_width: usize, total_height: usize) {
    let mut owner: IndexMap<(usize, usize), WorkerId> = IndexMap::new();
    for g in parts {
        for x in g.interior_x() {
            for y in g.interior_y() {
                let global = g
                    .to_global(x, y)
                    .unwrap_or_else(|| panic!("interior cell ({x}, {y}) has no global coordinate"));
                assert!(
                    global.0 < total_width && global.1 < total_height,
                    "rank {} maps ({x}, {y}) to {global:?}, outside {total_width}x{total_height}",
                    g.rank()
                );
                if let Some(prev) = owner.insert(global, g.rank()) {
                    panic!("cell {global:?} owned by both {prev} and {}", g.rank());
                }
            }
        }
    }
    assert_eq!(owner.len(), total_width * total_height, "cells dropped");
}

/// Assert that rank identifiers are a bijection onto `0..pool_size`.
pub fn assert_ranks_bijective(parts: &[PartitionGeometry]) {
    for (i, g) in parts.iter().enumerate() {
        assert_eq!(g.rank(), WorkerId(i), "rank mismatch for {g}");
        assert_eq!(g.pool_size(), parts.len());
    }
}

/// Assert that `b = neighbor(a, d)` implies `a = neighbor(b, opposite(d))`.
pub fn assert_neighbors_symmetric(parts: &[PartitionGeometry]) {
    for g in parts {
        let topo = g.topology();
        for d in Direction::ALL {
            if let Some(nb) = topo.neighbor(d) {
                let back = parts[nb.index()].topology().neighbor(d.opposite());
                assert_eq!(
                    back,
                    Some(g.rank()),
                    "{} -> {d} -> {nb} does not lead back",
                    g.rank()
                );
            }
        }
    }
}

/// Assert that neighbors across an edge agree on the edge length, so a
/// sent boundary always fits the receiver's ghost slab.
pub fn assert_shared_edges_match(parts: &[PartitionGeometry]) {
    for g in parts {
        let topo = g.topology();
        for d in Direction::ALL {
            let Some(nb) = topo.neighbor(d) else { continue };
            let other = &parts[nb.index()];
            match d {
                Direction::Left | Direction::Right => assert_eq!(
                    g.height(),
                    other.height(),
                    "{} and {nb} disagree on column length",
                    g.rank()
                ),
                Direction::Up | Direction::Down => assert_eq!(
                    g.width(),
                    other.width(),
                    "{} and {nb} disagree on row length",
                    g.rank()
                ),
            }
        }
    }
}

/// Run all compliance checks for one decomposition.
pub fn run_full_compliance(layout: Layout, total_width: usize, total_height: usize, pool_size: usize) {
    let parts = all_geometries(layout, total_width, total_height, pool_size);
    assert_ranks_bijective(&parts);
    assert_cells_owned_once(&parts, total_width, total_height);
    assert_neighbors_symmetric(&parts);
    assert_shared_edges_match(&parts);
}
