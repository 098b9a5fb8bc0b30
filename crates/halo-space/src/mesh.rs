//! Column-major local cell storage.

use std::ops::Range;

use halo_core::{CellAccess, MeshError};

use crate::geometry::PartitionGeometry;

/// A worker's local mesh: `width × height` cells of `directions` values.
///
/// Cell `(x, y)` starts at `(x * height + y) * directions`, so each
/// column is one contiguous run of `height * directions` values and a
/// row is strided by `height * directions`. Every access is bounds
/// checked against the stored extents.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalMesh {
    width: usize,
    height: usize,
    directions: usize,
    values: Vec<f64>,
}

impl LocalMesh {
    /// Zero-filled storage.
    ///
    /// Returns `Err(MeshError::EmptyMesh)` if any dimension is zero.
    pub fn new(width: usize, height: usize, directions: usize) -> Result<Self, MeshError> {
        if width == 0 || height == 0 || directions == 0 {
            return Err(MeshError::EmptyMesh);
        }
        Ok(Self {
            width,
            height,
            directions,
            values: vec![0.0; width * height * directions],
        })
    }

    /// Storage sized for `geometry`'s local extents, ghosts included.
    pub fn for_geometry(geometry: &PartitionGeometry, directions: usize) -> Result<Self, MeshError> {
        Self::new(geometry.width(), geometry.height(), directions)
    }

    /// Set every value of every cell with `f(x, y, k)`.
    pub fn fill_with(&mut self, mut f: impl FnMut(usize, usize, usize) -> f64) {
        let (h, d) = (self.height, self.directions);
        for (i, v) in self.values.iter_mut().enumerate() {
            let k = i % d;
            let cell = i / d;
            *v = f(cell / h, cell % h, k);
        }
    }

    /// The raw value buffer in storage order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize, MeshError> {
        if x >= self.width || y >= self.height {
            return Err(MeshError::CellOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((x * self.height + y) * self.directions)
    }

    fn column_bounds(&self, x: usize, rows: &Range<usize>) -> Result<Range<usize>, MeshError> {
        if x >= self.width || rows.start > rows.end || rows.end > self.height {
            return Err(MeshError::RowRangeOutOfBounds {
                x,
                start: rows.start,
                end: rows.end,
                height: self.height,
            });
        }
        let base = x * self.height;
        Ok((base + rows.start) * self.directions..(base + rows.end) * self.directions)
    }
}

impl CellAccess for LocalMesh {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn directions(&self) -> usize {
        self.directions
    }

    fn cell(&self, x: usize, y: usize) -> Result<&[f64], MeshError> {
        let start = self.offset(x, y)?;
        Ok(&self.values[start..start + self.directions])
    }

    fn cell_mut(&mut self, x: usize, y: usize) -> Result<&mut [f64], MeshError> {
        let start = self.offset(x, y)?;
        Ok(&mut self.values[start..start + self.directions])
    }

    fn column(&self, x: usize, rows: Range<usize>) -> Result<&[f64], MeshError> {
        let span = self.column_bounds(x, &rows)?;
        Ok(&self.values[span])
    }

    fn column_mut(&mut self, x: usize, rows: Range<usize>) -> Result<&mut [f64], MeshError> {
        let span = self.column_bounds(x, &rows)?;
        Ok(&mut self.values[span])
    }
}
