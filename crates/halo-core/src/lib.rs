//! Core types and traits for the halo domain-decomposition layer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: worker
//! identifiers, exchange directions, the mesh accessor trait, and the
//! error types raised by mesh access and message transport.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod direction;
pub mod error;
pub mod id;
pub mod traits;

pub use direction::{Axis, Direction, DirectionSet};
pub use error::{MeshError, TransportError};
pub use id::WorkerId;
pub use traits::CellAccess;
