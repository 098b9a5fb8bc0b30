//! Criterion micro-benchmarks for boundary copies.
//!
//! Compares the strided row path (through `BoundaryPacker`) with the
//! contiguous column path on the same local mesh.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use halo_core::CellAccess;
use halo_exchange::BoundaryPacker;
use halo_space::{LocalMesh, PartitionGeometry};

fn local_mesh() -> (PartitionGeometry, LocalMesh) {
    let g = PartitionGeometry::compute_2d(512, 128, 0, 4).unwrap();
    let mut mesh = LocalMesh::for_geometry(&g, 9).unwrap();
    mesh.fill_with(|x, y, k| (x * 31 + y * 7 + k) as f64);
    (g, mesh)
}

/// Benchmark: gather one 256-cell row into the scratch buffer.
fn bench_pack_row(c: &mut Criterion) {
    let (g, mesh) = local_mesh();
    let mut packer = BoundaryPacker::for_geometry(&g, 9);

    c.bench_function("pack_row_256x9", |b| {
        b.iter(|| {
            let buf = packer.pack(&mesh, 1).unwrap();
            black_box(buf);
        });
    });
}

/// Benchmark: scatter the scratch buffer back into a ghost row.
fn bench_unpack_row(c: &mut Criterion) {
    let (g, mut mesh) = local_mesh();
    let mut packer = BoundaryPacker::for_geometry(&g, 9);
    packer.pack(&mesh, 1).unwrap();

    c.bench_function("unpack_row_256x9", |b| {
        b.iter(|| {
            packer.unpack(&mut mesh, 0).unwrap();
            black_box(&mesh);
        });
    });
}

/// Benchmark: copy one 64-cell column out as an owned buffer, the
/// non-blocking path's equivalent of a pack.
fn bench_column_copy(c: &mut Criterion) {
    let (g, mesh) = local_mesh();
    let rows = g.interior_y();

    c.bench_function("column_copy_64x9", |b| {
        b.iter(|| {
            let v = mesh.column(1, rows.clone()).unwrap().to_vec();
            black_box(v);
        });
    });
}

criterion_group!(benches, bench_pack_row, bench_unpack_row, bench_column_copy);
criterion_main!(benches);
