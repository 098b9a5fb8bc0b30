//! Benchmark profiles and drivers for the halo exchange layer.
//!
//! - [`reference_config`]: 512x128 D2Q9 mesh, the size used by every
//!   exchange benchmark.
//! - [`run_exchanges`]: spin up a threaded pool and time a fixed number
//!   of exchange steps on every worker.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::thread;
use std::time::{Duration, Instant};

use halo_exchange::{CommContext, ExchangeConfig, ExchangePolicy};
use halo_space::{Layout, LocalMesh};
use halo_transport::ChannelFabric;

/// Reference profile: 512x128 cells, 9 values per cell.
pub fn reference_config(layout: Layout, policy: ExchangePolicy) -> ExchangeConfig {
    ExchangeConfig {
        layout,
        policy,
        directions_per_cell: 9,
        total_width: 512,
        total_height: 128,
    }
}

/// Run `steps` exchanges on every worker of a `pool_size` pool and
/// return the slowest worker's time spent exchanging.
///
/// Setup (geometry, mesh allocation) is excluded from the measurement.
pub fn run_exchanges(config: &ExchangeConfig, pool_size: usize, steps: u64) -> Duration {
    let handles: Vec<_> = ChannelFabric::build(pool_size)
        .into_iter()
        .map(|transport| {
            let config = config.clone();
            thread::spawn(move || {
                let ctx = CommContext::new(transport);
                let mut exchanger = config
                    .build(&ctx)
                    .unwrap_or_else(|e| panic!("bench config rejected: {e}"));
                let mut mesh = LocalMesh::for_geometry(exchanger.geometry(), config.directions_per_cell)
                    .unwrap_or_else(|e| panic!("bench mesh: {e}"));
                mesh.fill_with(|x, y, k| (x + y + k) as f64);

                let start = Instant::now();
                for _ in 0..steps {
                    exchanger
                        .exchange(&ctx, &mut mesh)
                        .unwrap_or_else(|e| panic!("bench exchange failed: {e}"));
                }
                start.elapsed()
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|h| h.join().unwrap_or_else(|_| panic!("bench worker panicked")))
        .max()
        .unwrap_or_default()
}
