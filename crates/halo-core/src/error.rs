//! Error types shared across the halo workspace.
//!
//! Mesh addressing failures and transport failures live here so that
//! every layer above can wrap them without depending on a concrete
//! storage or transport backend.

use std::error::Error;
use std::fmt;

use crate::direction::Direction;
use crate::id::WorkerId;

/// Errors from addressing cells in local mesh storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// A cell coordinate is outside `[0, width) × [0, height)`.
    CellOutOfBounds {
        /// Requested X coordinate.
        x: usize,
        /// Requested Y coordinate.
        y: usize,
        /// Local width.
        width: usize,
        /// Local height.
        height: usize,
    },
    /// A column row range is reversed or runs past the height.
    RowRangeOutOfBounds {
        /// Column index.
        x: usize,
        /// Requested range start.
        start: usize,
        /// Requested range end.
        end: usize,
        /// Local height.
        height: usize,
    },
    /// A buffer does not hold the number of values the operation needs.
    BufferLength {
        /// Values required.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },
    /// Storage was requested with a zero extent or zero directions.
    EmptyMesh,
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellOutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "cell ({x}, {y}) out of bounds: [0, {width}) x [0, {height})"
            ),
            Self::RowRangeOutOfBounds {
                x,
                start,
                end,
                height,
            } => write!(
                f,
                "rows {start}..{end} of column {x} out of bounds: [0, {height})"
            ),
            Self::BufferLength { expected, actual } => {
                write!(f, "buffer holds {actual} values, expected {expected}")
            }
            Self::EmptyMesh => write!(f, "mesh must have non-zero extents and directions"),
        }
    }
}

impl Error for MeshError {}

/// Errors from point-to-point message transport.
///
/// Every variant is fatal to the exchange that observed it: a lost
/// boundary transfer would silently corrupt neighbor state, so callers
/// do not retry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// The peer's endpoint is gone (its worker exited or panicked).
    Disconnected {
        /// The unreachable peer.
        peer: WorkerId,
        /// Tag of the failed transfer.
        tag: Direction,
    },
    /// The peer identifier is not part of this pool.
    UnknownPeer {
        /// The offending identifier.
        peer: WorkerId,
        /// Pool size.
        pool_size: usize,
    },
    /// A worker tried to message itself.
    SelfMessage {
        /// This worker.
        worker: WorkerId,
    },
    /// A received message does not have the expected length.
    LengthMismatch {
        /// Sending peer.
        peer: WorkerId,
        /// Tag of the transfer.
        tag: Direction,
        /// Values the receiver expected.
        expected: usize,
        /// Values that arrived.
        actual: usize,
    },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { peer, tag } => {
                write!(f, "peer {peer} disconnected during '{tag}' transfer")
            }
            Self::UnknownPeer { peer, pool_size } => {
                write!(f, "peer {peer} is not in a pool of size {pool_size}")
            }
            Self::SelfMessage { worker } => {
                write!(f, "worker {worker} attempted to message itself")
            }
            Self::LengthMismatch {
                peer,
                tag,
                expected,
                actual,
            } => write!(
                f,
                "'{tag}' message from peer {peer} has {actual} values, expected {expected}"
            ),
        }
    }
}

impl Error for TransportError {}
