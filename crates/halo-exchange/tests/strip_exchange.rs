//! Integration test: one-dimensional strip decomposition.
//!
//! Each test runs a real threaded pool over the channel fabric. The
//! watchdog in `run_pool` turns a deadlocked schedule into a failure.

use halo_core::{CellAccess, Direction, WorkerId};
use halo_exchange::{CommContext, ExchangeConfig, ExchangePolicy, ExchangeState};
use halo_space::{Layout, LocalMesh};
use halo_test_utils::{init_tracing, run_pool, synthetic_mesh, verify_halo, GHOST_SENTINEL};

fn strips(policy: ExchangePolicy, width: usize, height: usize) -> ExchangeConfig {
    ExchangeConfig {
        layout: Layout::Split1D,
        policy,
        directions_per_cell: 3,
        total_width: width,
        total_height: height,
    }
}

/// Run one exchange on a synthetic mesh per worker and return the meshes.
fn exchange_once(config: ExchangeConfig, pool: usize) -> Vec<LocalMesh> {
    run_pool(pool, move |transport| {
        let ctx = CommContext::new(transport);
        let mut ex = config.build(&ctx).unwrap();
        let mut mesh = synthetic_mesh(ex.geometry(), config.directions_per_cell);
        ex.exchange(&ctx, &mut mesh).unwrap();
        verify_halo(ex.geometry(), &mesh).unwrap_or_else(|m| panic!("rank {}: {m}", ctx.rank()));
        assert_eq!(ex.state(), ExchangeState::Idle);
        mesh
    })
}

#[test]
fn two_workers_on_four_by_three() {
    init_tracing();
    for policy in ExchangePolicy::ALL {
        let meshes = exchange_once(strips(policy, 4, 3), 2);
        let (left, right) = (&meshes[0], &meshes[1]);
        // Each worker owns two columns: local width 4, ghosts at 0 and 3.
        assert_eq!((left.width(), left.height()), (4, 3));
        for y in 0..3 {
            assert_eq!(left.cell(3, y).unwrap(), right.cell(1, y).unwrap(), "{policy} y={y}");
            assert_eq!(right.cell(0, y).unwrap(), left.cell(2, y).unwrap(), "{policy} y={y}");
            // Domain borders stay untouched.
            assert_eq!(left.cell(0, y).unwrap(), &[GHOST_SENTINEL; 3]);
            assert_eq!(right.cell(3, y).unwrap(), &[GHOST_SENTINEL; 3]);
        }
    }
}

#[test]
fn single_worker_is_a_no_op() {
    for policy in ExchangePolicy::ALL {
        let out = run_pool(1, move |transport| {
            let ctx = CommContext::new(transport);
            let mut ex = strips(policy, 7, 5).build(&ctx).unwrap();
            for d in Direction::ALL {
                assert_eq!(ex.topology().neighbor(d), None);
            }
            let mut mesh = synthetic_mesh(ex.geometry(), 3);
            let before = mesh.clone();
            let metrics = ex.exchange(&ctx, &mut mesh).unwrap();
            (mesh == before, metrics.messages_sent + metrics.messages_received)
        });
        assert_eq!(out, vec![(true, 0)], "{policy}");
    }
}

#[test]
fn parity_completes_on_odd_pools() {
    for pool in [3, 5, 7] {
        exchange_once(strips(ExchangePolicy::ParityBlocking, 21, 4), pool);
    }
}

#[test]
fn remainder_goes_to_the_last_strip() {
    let meshes = exchange_once(strips(ExchangePolicy::FourNeighbor, 11, 2), 3);
    let widths: Vec<_> = meshes.iter().map(|m| m.width()).collect();
    assert_eq!(widths, vec![5, 5, 7]);
}

#[test]
fn nonblocking_matches_parity_bit_for_bit() {
    let parity = exchange_once(strips(ExchangePolicy::ParityBlocking, 29, 6), 4);
    let nonblocking = exchange_once(strips(ExchangePolicy::NonBlocking, 29, 6), 4);
    for (rank, (a, b)) in parity.iter().zip(&nonblocking).enumerate() {
        let bits = |m: &LocalMesh| m.as_slice().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(a), bits(b), "rank {rank}");
    }
}

#[test]
fn repeated_exchanges_track_changing_interiors() {
    let config = strips(ExchangePolicy::NonBlocking, 12, 3);
    let steps = 5u64;
    let out = run_pool(3, move |transport| {
        let ctx = CommContext::new(transport);
        let mut ex = config.build(&ctx).unwrap();
        let mut mesh = LocalMesh::for_geometry(ex.geometry(), 3).unwrap();
        let me = ctx.rank().index() as f64;
        let mut seen = Vec::new();
        for step in 0..steps {
            let stamp = me * 100.0 + step as f64;
            let xs = ex.geometry().interior_x();
            mesh.fill_with(|x, _, _| if xs.contains(&x) { stamp } else { -1.0 });
            ex.exchange(&ctx, &mut mesh).unwrap();
            seen.push(mesh.cell(0, 0).unwrap()[0]);
        }
        (seen, ex.exchanges(), ex.last_metrics().exchanges)
    });

    // Rank 1's left ghost sees rank 0's stamp of the same step.
    assert_eq!(out[1].0, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    // Rank 0 has no left neighbor.
    assert!(out[0].0.iter().all(|&v| v == -1.0));
    assert!(out.iter().all(|(_, n, m)| *n == steps && *m == steps));
}

#[test]
fn metrics_count_traffic() {
    let out = run_pool(3, |transport| {
        let ctx = CommContext::new(transport);
        let mut ex = strips(ExchangePolicy::ParityBlocking, 9, 4).build(&ctx).unwrap();
        let mut mesh = synthetic_mesh(ex.geometry(), 3);
        ex.exchange(&ctx, &mut mesh).unwrap()
    });
    // Middle strip talks to both sides; 4 rows x 3 values per message.
    assert_eq!(out[1].messages_sent, 2);
    assert_eq!(out[1].messages_received, 2);
    assert_eq!(out[1].values_received, 24);
    assert_eq!(out[0].messages_sent, 1);
    assert_eq!(out[2].values_sent, 12);
}

#[test]
fn context_rank_drives_geometry() {
    let out = run_pool(4, |transport| {
        let ctx = CommContext::new(transport);
        let ex = strips(ExchangePolicy::ParityBlocking, 40, 2).build(&ctx).unwrap();
        (ex.geometry().rank(), ex.geometry().origin_x())
    });
    assert_eq!(
        out,
        vec![(WorkerId(0), 0), (WorkerId(1), 10), (WorkerId(2), 20), (WorkerId(3), 30)]
    );
}
