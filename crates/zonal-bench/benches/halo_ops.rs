//! Criterion benchmarks for layout construction and halo exchange.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use zonal_bench::{channel_layouts, distribution, reference_grid};
use zonal_field::{Communicator, Field, FunctionSpace, SerialComm, StructuredColumns};

/// Benchmark: Decompose O32 into 8 parts and derive every rank's halo plan.
fn bench_layout_o32_8(c: &mut Criterion) {
    let grid = reference_grid();
    c.bench_function("layout_o32_8", |b| {
        b.iter(|| black_box(channel_layouts(&grid, "checkerboard", 8).unwrap()));
    });
}

/// Benchmark: Serial exchange of a 4-variable field on O32 (no peers).
fn bench_serial_exchange_o32(c: &mut Criterion) {
    let grid = reference_grid();
    let comm: Arc<dyn Communicator> = Arc::new(SerialComm::new());
    let dist = distribution(&grid, "block", 1);
    let fs: Arc<dyn FunctionSpace> =
        Arc::new(StructuredColumns::new(grid.clone(), &dist, comm).unwrap());
    let mut field = Field::new_real64("q", 4, fs).unwrap();
    c.bench_function("serial_exchange_o32", |b| {
        b.iter(|| field.halo_exchange().unwrap());
    });
}

/// Benchmark: One exchange of a 4-variable field across 4 threads on O32.
fn bench_threaded_exchange_o32_4(c: &mut Criterion) {
    let grid = reference_grid();
    let mut fields: Vec<Field> = channel_layouts(&grid, "checkerboard", 4)
        .unwrap()
        .into_iter()
        .map(|layout| {
            let fs: Arc<dyn FunctionSpace> = Arc::new(layout);
            Field::new_real64("q", 4, fs).unwrap()
        })
        .collect();
    c.bench_function("threaded_exchange_o32_4", |b| {
        b.iter(|| {
            std::thread::scope(|s| {
                for field in fields.iter_mut() {
                    s.spawn(move || field.halo_exchange().unwrap());
                }
            });
        });
    });
}

criterion_group!(
    benches,
    bench_layout_o32_8,
    bench_serial_exchange_o32,
    bench_threaded_exchange_o32_4
);
criterion_main!(benches);
