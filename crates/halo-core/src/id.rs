//! Strongly-typed worker identifier.

use std::fmt;

/// Identifies a worker within the pool.
///
/// Workers are numbered `0..pool_size`. On a two-dimensional partition
/// grid the identifier is the row-major linear index
/// `coord_y * partitions_x + coord_x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub usize);

impl WorkerId {
    /// The identifier as a plain index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for WorkerId {
    fn from(v: usize) -> Self {
        Self(v)
    }
}
