//! Ghost-cell exchange between the workers of a decomposed mesh.
//!
//! After every simulation step each worker calls
//! [`HaloExchanger::exchange`], which sends its boundary slabs to its
//! geometric neighbors and writes theirs into its ghost rings. Three
//! [`ExchangePolicy`] orderings are available, each deadlock-free on
//! both partition layouts:
//!
//! - [`ParityBlocking`](ExchangePolicy::ParityBlocking): blocking
//!   transfers, odd coordinates send first.
//! - [`NonBlocking`](ExchangePolicy::NonBlocking): issue everything,
//!   then one combined wait.
//! - [`FourNeighbor`](ExchangePolicy::FourNeighbor): blocking shift,
//!   rows packed through [`BoundaryPacker`].
//!
//! # Example
//!
//! ```
//! use halo_core::CellAccess;
//! use halo_exchange::{CommContext, ExchangeConfig, ExchangePolicy};
//! use halo_space::LocalMesh;
//! use halo_transport::ChannelFabric;
//!
//! let config = ExchangeConfig {
//!     policy: ExchangePolicy::NonBlocking,
//!     total_width: 16,
//!     total_height: 4,
//!     ..Default::default()
//! };
//!
//! let workers: Vec<_> = ChannelFabric::build(2)
//!     .into_iter()
//!     .map(|transport| {
//!         let config = config.clone();
//!         std::thread::spawn(move || {
//!             let ctx = CommContext::new(transport);
//!             let mut exchanger = config.build(&ctx).unwrap();
//!             let mut mesh = LocalMesh::for_geometry(exchanger.geometry(), 9).unwrap();
//!             exchanger.exchange(&ctx, &mut mesh).unwrap();
//!             mesh.width()
//!         })
//!     })
//!     .collect();
//!
//! for w in workers {
//!     assert_eq!(w.join().unwrap(), 10);
//! }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
pub mod exchanger;
pub mod metrics;
pub mod packer;
pub mod policy;

pub use config::{ConfigError, ExchangeConfig};
pub use context::CommContext;
pub use error::ExchangeError;
pub use exchanger::{ExchangeState, HaloExchanger};
pub use metrics::ExchangeMetrics;
pub use packer::BoundaryPacker;
pub use policy::{ExchangePolicy, Schedule, Step};
