//! Criterion micro-benchmarks for canonical reads and region enumeration.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strata_bench::{reference_section, sample_coords, REFERENCE_EXTENT};
use strata_core::{Lattice, RegionExt};
use strata_region::{canonicalize, IsotropicLattice};

/// Benchmark: canonicalize 10K coordinates of the full 3D lattice.
fn bench_canonicalize_10k(c: &mut Criterion) {
    let samples = sample_coords(3, REFERENCE_EXTENT, 10_000);

    c.bench_function("canonicalize_3d_10k", |b| {
        b.iter(|| {
            for p in &samples {
                black_box(canonicalize(p).ok());
            }
        });
    });
}

/// Benchmark: 10K reads of the full lattice through its canonical section.
fn bench_isotropic_read_10k(c: &mut Criterion) {
    let lattice = IsotropicLattice::new(reference_section().unwrap());
    let samples = sample_coords(3, REFERENCE_EXTENT, 10_000);

    c.bench_function("isotropic_read_3d_10k", |b| {
        b.iter(|| {
            for p in &samples {
                black_box(lattice.read(p).unwrap());
            }
        });
    });
}

/// Benchmark: enumerate every cell of the reference section.
fn bench_section_positions(c: &mut Criterion) {
    let section = reference_section().unwrap();

    c.bench_function("section_positions_3d", |b| {
        b.iter(|| black_box(section.positions().count()));
    });
}

criterion_group!(
    benches,
    bench_canonicalize_10k,
    bench_isotropic_read_10k,
    bench_section_positions
);
criterion_main!(benches);
