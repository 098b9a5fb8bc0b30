//! Exchange failure type.

use std::error::Error;
use std::fmt;

use halo_core::{MeshError, TransportError, WorkerId};

use crate::exchanger::ExchangeState;

/// Errors from [`HaloExchanger::exchange`](crate::HaloExchanger::exchange).
///
/// `Transport` and `Mesh` failures happen part-way through an exchange
/// and poison the exchanger. `ShapeMismatch` and `ContextMismatch` are
/// detected before any transfer and leave it usable.
#[derive(Clone, Debug, PartialEq)]
pub enum ExchangeError {
    /// A transfer failed.
    Transport(TransportError),
    /// A boundary or ghost slab could not be read or written.
    Mesh(MeshError),
    /// The mesh does not have the extents the exchanger was built for.
    ShapeMismatch {
        /// `(width, height, directions)` the exchanger expects.
        expected: (usize, usize, usize),
        /// `(width, height, directions)` of the mesh supplied.
        actual: (usize, usize, usize),
    },
    /// The context belongs to a different worker or pool.
    ContextMismatch {
        /// `(rank, pool_size)` the exchanger was built for.
        expected: (WorkerId, usize),
        /// `(rank, pool_size)` of the context supplied.
        actual: (WorkerId, usize),
    },
    /// An earlier exchange failed part-way; ghost contents are undefined.
    Poisoned {
        /// Phase the failed exchange had reached.
        state: ExchangeState,
    },
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Mesh(e) => write!(f, "mesh: {e}"),
            Self::ShapeMismatch { expected, actual } => write!(
                f,
                "mesh is {}x{}x{}, exchanger expects {}x{}x{}",
                actual.0, actual.1, actual.2, expected.0, expected.1, expected.2
            ),
            Self::ContextMismatch { expected, actual } => write!(
                f,
                "context is worker {} of {}, exchanger belongs to worker {} of {}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::Poisoned { state } => {
                write!(f, "exchanger poisoned by a failure in state {state}")
            }
        }
    }
}

impl Error for ExchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Mesh(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for ExchangeError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<MeshError> for ExchangeError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}
