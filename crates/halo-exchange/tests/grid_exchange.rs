//! Integration test: two-row grid decomposition and failure handling.

use halo_core::{CellAccess, Direction, TransportError, WorkerId};
use halo_exchange::{
    CommContext, ConfigError, ExchangeConfig, ExchangeError, ExchangePolicy, ExchangeState,
};
use halo_space::{GeometryError, Layout};
use halo_test_utils::{
    init_tracing, run_pool, synthetic_mesh, synthetic_value, verify_halo, GHOST_SENTINEL,
};

fn grid(policy: ExchangePolicy, width: usize, height: usize) -> ExchangeConfig {
    ExchangeConfig {
        layout: Layout::Split2D,
        policy,
        directions_per_cell: 2,
        total_width: width,
        total_height: height,
    }
}

#[test]
fn four_neighbor_two_by_two_keeps_corners() {
    init_tracing();
    let meshes = run_pool(4, |transport| {
        let ctx = CommContext::new(transport);
        let mut ex = grid(ExchangePolicy::FourNeighbor, 8, 6).build(&ctx).unwrap();
        let mut mesh = synthetic_mesh(ex.geometry(), 2);
        ex.exchange(&ctx, &mut mesh).unwrap();
        (ex.geometry().clone(), mesh)
    });

    // Local meshes are 6x5: interior x 1..5, y 1..4.
    let (g0, m0) = &meshes[0];
    assert_eq!((m0.width(), m0.height()), (6, 5));

    // Right ghost of rank 0 holds rank 1's first interior column (global x = 4).
    for y in 1..4 {
        assert_eq!(m0.cell(5, y).unwrap()[0], synthetic_value(4, y - 1, 0));
    }
    // Bottom ghost of rank 0 holds rank 2's first interior row (global y = 3).
    for x in 1..5 {
        assert_eq!(m0.cell(x, 4).unwrap()[1], synthetic_value(x - 1, 3, 1));
    }
    // Corners are never exchanged, even the one facing diagonal rank 3.
    for (x, y) in [(0, 0), (5, 0), (0, 4), (5, 4)] {
        assert_eq!(m0.cell(x, y).unwrap(), &[GHOST_SENTINEL; 2], "corner ({x}, {y})");
    }

    for (g, m) in &meshes {
        verify_halo(g, m).unwrap_or_else(|e| panic!("{g}: {e}"));
    }
    assert_eq!(g0.topology().neighbor(Direction::Down), Some(WorkerId(2)));
}

#[test]
fn every_policy_on_every_layout_verifies() {
    let cases = [
        (Layout::Split1D, 1),
        (Layout::Split1D, 2),
        (Layout::Split1D, 5),
        (Layout::Split2D, 2),
        (Layout::Split2D, 4),
        (Layout::Split2D, 6),
        (Layout::Split2D, 10),
    ];
    for policy in ExchangePolicy::ALL {
        for (layout, pool) in cases {
            let config = ExchangeConfig {
                layout,
                policy,
                directions_per_cell: 3,
                total_width: 23,
                total_height: 11,
            };
            run_pool(pool, move |transport| {
                let ctx = CommContext::new(transport);
                let mut ex = config.build(&ctx).unwrap();
                let mut mesh = synthetic_mesh(ex.geometry(), 3);
                // Twice: the second exchange must leave the same result.
                for _ in 0..2 {
                    ex.exchange(&ctx, &mut mesh).unwrap();
                    verify_halo(ex.geometry(), &mesh).unwrap_or_else(|m| {
                        panic!("{policy} {layout} pool {pool} rank {}: {m}", ctx.rank())
                    });
                }
            });
        }
    }
}

#[test]
fn nonblocking_matches_parity_on_grid() {
    let run = |policy| {
        run_pool(6, move |transport| {
            let ctx = CommContext::new(transport);
            let mut ex = grid(policy, 17, 9).build(&ctx).unwrap();
            let mut mesh = synthetic_mesh(ex.geometry(), 2);
            ex.exchange(&ctx, &mut mesh).unwrap();
            mesh
        })
    };
    assert_eq!(run(ExchangePolicy::ParityBlocking), run(ExchangePolicy::NonBlocking));
}

#[test]
fn odd_pool_is_a_named_config_error() {
    let out = run_pool(3, |transport| {
        let ctx = CommContext::new(transport);
        grid(ExchangePolicy::ParityBlocking, 8, 8).build(&ctx).err()
    });
    for err in out {
        assert_eq!(
            err,
            Some(ConfigError::Geometry(GeometryError::OddPool { pool_size: 3 }))
        );
    }
}

#[test]
fn too_many_partitions_for_the_domain() {
    let out = run_pool(2, |transport| {
        let ctx = CommContext::new(transport);
        grid(ExchangePolicy::ParityBlocking, 8, 1).build(&ctx).err()
    });
    assert!(matches!(
        out[0],
        Some(ConfigError::Geometry(GeometryError::DomainTooSmall { .. }))
    ));
}

#[test]
fn departed_peer_poisons_the_exchanger() {
    for policy in ExchangePolicy::ALL {
        let out = run_pool(2, move |transport| {
            let ctx = CommContext::new(transport);
            let mut ex = grid(policy, 8, 4).build(&ctx).unwrap();
            if ctx.rank() == WorkerId(1) {
                // Leave the pool without exchanging.
                return None;
            }
            let mut mesh = synthetic_mesh(ex.geometry(), 2);
            let first = ex.exchange(&ctx, &mut mesh);
            let second = ex.exchange(&ctx, &mut mesh);
            Some((first, second, ex.is_poisoned(), ex.state()))
        });

        let (first, second, poisoned, state) = out[0].clone().unwrap();
        assert!(
            matches!(
                first,
                Err(ExchangeError::Transport(TransportError::Disconnected {
                    peer: WorkerId(1),
                    ..
                }))
            ),
            "{policy}: {first:?}"
        );
        assert!(poisoned);
        assert_ne!(state, ExchangeState::Idle);
        assert_eq!(second, Err(ExchangeError::Poisoned { state }));
    }
}
