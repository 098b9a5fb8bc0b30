//! Test utilities for halo development.
//!
//! - [`fixtures`]: meshes filled with globally unique values and a
//!   checker that knows what every ghost cell should hold after an
//!   exchange.
//! - [`pool`]: runs one closure per worker on its own thread, wired
//!   through a [`ChannelFabric`](halo_transport::ChannelFabric), with a
//!   watchdog that fails the test instead of hanging on a deadlock.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod pool;

pub use fixtures::{
    synthetic_mesh, synthetic_value, verify_halo, HaloMismatch, GHOST_SENTINEL,
};
pub use pool::{run_pool, run_pool_with_timeout, DEFAULT_TIMEOUT};

/// Install a `tracing` subscriber for test output, filtered by
/// `RUST_LOG`. Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
