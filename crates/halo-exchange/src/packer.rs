//! Row packing for the non-contiguous axis.
//!
//! Columns are contiguous in storage and go on the wire as-is. A row is
//! strided, so its cells are gathered into a flat buffer before sending
//! and scattered back after receiving.

use std::ops::Range;

use halo_core::{CellAccess, MeshError};
use halo_space::PartitionGeometry;

/// Gathers and scatters one row span through a reusable scratch buffer.
///
/// The buffer is sized once, `span.len() * directions` values, and
/// cached for the packer's lifetime. Cell `(x, row)` occupies
/// `buffer[(x - span.start) * directions..][..directions]`.
///
/// Methods that touch the scratch buffer take `&mut self`, so it can
/// never back two transfers at once.
#[derive(Clone, Debug)]
pub struct BoundaryPacker {
    span: Range<usize>,
    directions: usize,
    buffer: Vec<f64>,
}

impl BoundaryPacker {
    /// A packer for cells `span` of any row, `directions` values each.
    pub fn new(span: Range<usize>, directions: usize) -> Self {
        let len = span.len() * directions;
        Self {
            span,
            directions,
            buffer: vec![0.0; len],
        }
    }

    /// A packer spanning `geometry`'s interior columns, which is the row
    /// extent exchanged with vertical neighbors.
    pub fn for_geometry(geometry: &PartitionGeometry, directions: usize) -> Self {
        Self::new(geometry.interior_x(), directions)
    }

    /// Columns covered by a packed row.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Values in one packed row.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Copy row `row` into the scratch buffer and return it.
    pub fn pack<M: CellAccess + ?Sized>(&mut self, mesh: &M, row: usize) -> Result<&[f64], MeshError> {
        gather(&self.span, self.directions, mesh, row, &mut self.buffer)?;
        Ok(&self.buffer)
    }

    /// Copy the scratch buffer into row `row`.
    pub fn unpack<M: CellAccess + ?Sized>(&self, mesh: &mut M, row: usize) -> Result<(), MeshError> {
        scatter(&self.span, self.directions, mesh, row, &self.buffer)
    }

    /// The scratch buffer as a receive target.
    pub fn buffer_mut(&mut self) -> &mut [f64] {
        &mut self.buffer
    }

    /// Pack row `row` into a fresh buffer, leaving the scratch buffer
    /// alone. For transfers that must own their data until completion.
    pub fn pack_owned<M: CellAccess + ?Sized>(&self, mesh: &M, row: usize) -> Result<Vec<f64>, MeshError> {
        let mut out = vec![0.0; self.len()];
        gather(&self.span, self.directions, mesh, row, &mut out)?;
        Ok(out)
    }

    /// Unpack `data` into row `row`.
    pub fn unpack_from<M: CellAccess + ?Sized>(
        &self,
        mesh: &mut M,
        row: usize,
        data: &[f64],
    ) -> Result<(), MeshError> {
        scatter(&self.span, self.directions, mesh, row, data)
    }
}

fn check_buffer(span: &Range<usize>, directions: usize, buf: &[f64]) -> Result<(), MeshError> {
    let expected = span.len() * directions;
    if buf.len() != expected {
        return Err(MeshError::BufferLength {
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

fn gather<M: CellAccess + ?Sized>(
    span: &Range<usize>,
    directions: usize,
    mesh: &M,
    row: usize,
    out: &mut [f64],
) -> Result<(), MeshError> {
    check_buffer(span, directions, out)?;
    if out.is_empty() {
        return Ok(());
    }
    for (x, dst) in span.clone().zip(out.chunks_exact_mut(directions)) {
        dst.copy_from_slice(mesh.cell(x, row)?);
    }
    Ok(())
}

fn scatter<M: CellAccess + ?Sized>(
    span: &Range<usize>,
    directions: usize,
    mesh: &mut M,
    row: usize,
    data: &[f64],
) -> Result<(), MeshError> {
    check_buffer(span, directions, data)?;
    if data.is_empty() {
        return Ok(());
    }
    for (x, src) in span.clone().zip(data.chunks_exact(directions)) {
        mesh.cell_mut(x, row)?.copy_from_slice(src);
    }
    Ok(())
}
