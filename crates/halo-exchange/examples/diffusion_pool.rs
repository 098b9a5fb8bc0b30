//! Heat diffusion on a decomposed mesh, one thread per partition.
//!
//! Demonstrates:
//!   1. Building one `CommContext` per worker from a `ChannelFabric`
//!   2. Turning a shared `ExchangeConfig` into per-worker exchangers
//!   3. Alternating a local Jacobi update with a halo exchange
//!   4. Reading per-exchange metrics
//!
//! Run with:
//!   RUST_LOG=halo_exchange=debug cargo run --example diffusion_pool -- [policy] [layout] [pool] [steps]
//!
//! e.g. `cargo run --example diffusion_pool -- nonblocking 2d 6 200`

use std::env;
use std::process::ExitCode;
use std::thread;

use halo_core::CellAccess;
use halo_exchange::{CommContext, ExchangeConfig, ExchangeMetrics, ExchangePolicy};
use halo_space::{Layout, LocalMesh, PartitionGeometry};
use halo_transport::ChannelFabric;

// ─── Model parameters ───────────────────────────────────────────

const DIFFUSION: f64 = 0.2;
const SOURCE_HEAT: f64 = 100.0;

/// Heat at local `(x, y)`, zero off the mesh (absorbing domain border).
fn heat(mesh: &LocalMesh, x: isize, y: isize) -> f64 {
    if x < 0 || y < 0 {
        return 0.0;
    }
    mesh.cell(x as usize, y as usize).map(|c| c[0]).unwrap_or(0.0)
}

/// One explicit step of the 4-point Laplacian over the interior.
fn jacobi_step(geometry: &PartitionGeometry, old: &LocalMesh, new: &mut LocalMesh, source: Option<(usize, usize)>) {
    for x in geometry.interior_x() {
        for y in geometry.interior_y() {
            let (xi, yi) = (x as isize, y as isize);
            let c = heat(old, xi, yi);
            let lap = heat(old, xi - 1, yi) + heat(old, xi + 1, yi) + heat(old, xi, yi - 1)
                + heat(old, xi, yi + 1)
                - 4.0 * c;
            if let Ok(cell) = new.cell_mut(x, y) {
                cell[0] = c + DIFFUSION * lap;
            }
        }
    }
    if let Some((x, y)) = source {
        if let Ok(cell) = new.cell_mut(x, y) {
            cell[0] = SOURCE_HEAT;
        }
    }
}

/// Local coordinate of global cell `(gx, gy)` if this worker owns it.
fn owned_local(geometry: &PartitionGeometry, gx: usize, gy: usize) -> Option<(usize, usize)> {
    geometry.interior_x().find_map(|x| {
        geometry
            .interior_y()
            .find(|&y| geometry.to_global(x, y) == Some((gx, gy)))
            .map(|y| (x, y))
    })
}

fn parse_args() -> Result<(ExchangePolicy, Layout, usize, u64), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let policy = args.first().map_or(Ok(ExchangePolicy::default()), |s| s.parse())?;
    let layout = args.get(1).map_or(Ok(Layout::default()), |s| s.parse())?;
    let pool = args
        .get(2)
        .map_or(Ok(4), |s| s.parse::<usize>())
        .map_err(|e| format!("pool size: {e}"))?;
    let steps = args
        .get(3)
        .map_or(Ok(100), |s| s.parse::<u64>())
        .map_err(|e| format!("steps: {e}"))?;
    Ok((policy, layout, pool, steps))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let (policy, layout, pool, steps) = match parse_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = ExchangeConfig {
        layout,
        policy,
        directions_per_cell: 1,
        total_width: 64,
        total_height: 32,
    };
    let centre = (config.total_width / 2, config.total_height / 2);
    tracing::info!(%policy, %layout, pool, steps, "starting diffusion run");

    let workers: Vec<_> = ChannelFabric::build(pool)
        .into_iter()
        .map(|transport| {
            let config = config.clone();
            thread::spawn(move || -> Result<(f64, ExchangeMetrics), String> {
                let ctx = CommContext::new(transport);
                let mut exchanger = config.build(&ctx).map_err(|e| e.to_string())?;
                let geometry = exchanger.geometry().clone();
                let source = owned_local(&geometry, centre.0, centre.1);

                let mut current = LocalMesh::for_geometry(&geometry, 1).map_err(|e| e.to_string())?;
                let mut next = current.clone();
                let mut total_metrics = ExchangeMetrics::default();

                for _ in 0..steps {
                    exchanger
                        .exchange(&ctx, &mut current)
                        .map_err(|e| format!("rank {}: {e}", ctx.rank()))?;
                    jacobi_step(&geometry, &current, &mut next, source);
                    std::mem::swap(&mut current, &mut next);

                    let m = exchanger.last_metrics();
                    total_metrics.wait_us += m.wait_us;
                    total_metrics.pack_us += m.pack_us;
                    total_metrics.values_sent += m.values_sent;
                }
                total_metrics.exchanges = exchanger.exchanges();

                let interior_heat = geometry
                    .interior_x()
                    .flat_map(|x| geometry.interior_y().map(move |y| (x, y)))
                    .filter_map(|(x, y)| current.cell(x, y).ok().map(|c| c[0]))
                    .sum();
                Ok((interior_heat, total_metrics))
            })
        })
        .collect();

    let mut total = 0.0;
    for (rank, handle) in workers.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok((h, m))) => {
                println!(
                    "rank {rank}: heat {h:10.3}  exchanges {}  sent {} values  waited {} us  packed {} us",
                    m.exchanges, m.values_sent, m.wait_us, m.pack_us
                );
                total += h;
            }
            Ok(Err(e)) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
            Err(_) => {
                eprintln!("error: rank {rank} panicked");
                return ExitCode::FAILURE;
            }
        }
    }
    println!("total heat after {steps} steps: {total:.3}");
    ExitCode::SUCCESS
}
