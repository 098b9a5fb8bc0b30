//! Halo: domain decomposition and ghost-cell exchange for 2D stencil meshes.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! halo sub-crates. For most users, adding `halo` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use halo::prelude::*;
//!
//! let config = ExchangeConfig {
//!     layout: Layout::Split2D,
//!     policy: ExchangePolicy::FourNeighbor,
//!     total_width: 32,
//!     total_height: 16,
//!     ..Default::default()
//! };
//!
//! let workers: Vec<_> = ChannelFabric::build(4)
//!     .into_iter()
//!     .map(|transport| {
//!         let config = config.clone();
//!         std::thread::spawn(move || {
//!             let ctx = CommContext::new(transport);
//!             let mut exchanger = config.build(&ctx).unwrap();
//!             let mut mesh = LocalMesh::for_geometry(exchanger.geometry(), 9).unwrap();
//!             for _ in 0..3 {
//!                 // ... update interior cells from the ghost rings ...
//!                 exchanger.exchange(&ctx, &mut mesh).unwrap();
//!             }
//!             exchanger.exchanges()
//!         })
//!     })
//!     .collect();
//!
//! for w in workers {
//!     assert_eq!(w.join().unwrap(), 3);
//! }
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `halo-core` | Worker IDs, directions, mesh accessor trait, shared errors |
//! | [`space`] | `halo-space` | Partition geometry, neighbor topology, local storage |
//! | [`transport`] | `halo-transport` | Transport trait and in-process channel fabric |
//! | [`exchange`] | `halo-exchange` | Exchanger, policies, packer, configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`halo-core`).
///
/// Contains [`types::WorkerId`], [`types::Direction`], the
/// [`types::CellAccess`] mesh accessor, and the error types shared by
/// every layer.
pub use halo_core as types;

/// Partition geometry and local storage (`halo-space`).
pub use halo_space as space;

/// Point-to-point transport (`halo-transport`).
///
/// Implement [`transport::Transport`] to run the exchanger over another
/// fabric; [`transport::ChannelFabric`] wires threads in one process.
pub use halo_transport as transport;

/// Ghost-cell exchange (`halo-exchange`).
pub use halo_exchange as exchange;

/// Common imports for typical halo usage.
///
/// ```rust
/// use halo::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use halo_core::{Axis, CellAccess, Direction, WorkerId};

    // Errors
    pub use halo_core::{MeshError, TransportError};
    pub use halo_exchange::{ConfigError, ExchangeError};
    pub use halo_space::GeometryError;

    // Space
    pub use halo_space::{Layout, LocalMesh, NeighborTopology, PartitionGeometry};

    // Transport
    pub use halo_transport::{ChannelFabric, ChannelTransport, Transport};

    // Exchange
    pub use halo_exchange::{
        BoundaryPacker, CommContext, ExchangeConfig, ExchangeMetrics, ExchangePolicy,
        ExchangeState, HaloExchanger,
    };
}
