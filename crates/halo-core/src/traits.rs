//! Mesh accessor abstraction.

use std::ops::Range;

use crate::error::MeshError;

/// Indexed access to a worker's local cell storage.
///
/// The exchange layer never allocates or owns mesh memory; it reads and
/// writes cells through this trait. Each cell is a fixed-length vector
/// of `directions()` values. Coordinates are local, in
/// `[0, width) × [0, height)`, ghost rings included.
///
/// Implementations store columns contiguously: the cells `(x, y)` for
/// consecutive `y` at fixed `x` occupy consecutive slots, which is what
/// makes [`column`](CellAccess::column) a single slice. Rows are strided
/// and have to be gathered cell by cell.
pub trait CellAccess {
    /// Local extent along X, ghost columns included.
    fn width(&self) -> usize;

    /// Local extent along Y, ghost rows included.
    fn height(&self) -> usize;

    /// Number of values per cell.
    fn directions(&self) -> usize;

    /// Read the cell at `(x, y)`.
    fn cell(&self, x: usize, y: usize) -> Result<&[f64], MeshError>;

    /// Mutable access to the cell at `(x, y)`.
    fn cell_mut(&mut self, x: usize, y: usize) -> Result<&mut [f64], MeshError>;

    /// The contiguous values of cells `(x, rows.start) .. (x, rows.end)`.
    fn column(&self, x: usize, rows: Range<usize>) -> Result<&[f64], MeshError>;

    /// Mutable counterpart of [`column`](CellAccess::column).
    fn column_mut(&mut self, x: usize, rows: Range<usize>) -> Result<&mut [f64], MeshError>;
}
