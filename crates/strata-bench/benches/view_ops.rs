//! Criterion micro-benchmarks for view binding and view reads.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strata_bench::{reference_section, REFERENCE_EXTENT};
use strata_core::{Lattice, RegionExt};
use strata_view::{CrossSection, DiagonalCrossSection, Slope, Subsection};

/// Benchmark: bind a diagonal view, which scans the source boundary.
fn bench_diagonal_bind(c: &mut Criterion) {
    let section = reference_section().unwrap();

    c.bench_function("diagonal_bind_3d", |b| {
        b.iter(|| {
            let view =
                DiagonalCrossSection::new(&section, 0, 1, Slope::Negative, REFERENCE_EXTENT)
                    .unwrap();
            black_box(view.relation());
        });
    });
}

/// Benchmark: read every cell of a diagonal view.
fn bench_diagonal_read_all(c: &mut Criterion) {
    let section = reference_section().unwrap();
    let view = DiagonalCrossSection::new(&section, 1, 2, Slope::Positive, 0).unwrap();
    let cells: Vec<_> = view.positions().collect();

    c.bench_function("diagonal_read_all_3d", |b| {
        b.iter(|| {
            for cell in &cells {
                black_box(view.read(cell).unwrap());
            }
        });
    });
}

/// Benchmark: enumerate a cross-section nested in a subsection.
fn bench_nested_positions(c: &mut Criterion) {
    let section = reference_section().unwrap();
    let sub = Subsection::new(&section, &[Some(10), None, None], &[Some(50), None, None]).unwrap();
    let view = CrossSection::new(&sub, 1, 5).unwrap();

    c.bench_function("nested_positions_3d", |b| {
        b.iter(|| black_box(view.positions().count()));
    });
}

criterion_group!(
    benches,
    bench_diagonal_bind,
    bench_diagonal_read_all,
    bench_nested_positions
);
criterion_main!(benches);
