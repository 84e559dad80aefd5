use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use porenet::dump::dump_network_to_writer;
use porenet::network::PoreNetwork;
use porenet::statoil::{StatoilConfig, export_network};
use porenet::synthetic::{NetworkShape, add_darcy_band, generate_network};
use porenet::table::{network_from_tables, tables_from_network};

const LATTICE_SEED: u64 = 0x5EED;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

fn bench_scales() -> &'static [usize] {
    #[cfg(feature = "bench-ci")]
    {
        &[6, 10]
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        &[10, 16, 24]
    }
}

fn lattice_with_band(side: usize) -> PoreNetwork {
    let mut net = generate_network(
        NetworkShape::Lattice {
            nx: side,
            ny: side,
            nz: side,
        },
        LATTICE_SEED,
    )
    .expect("lattice");
    let third = side as f64 / 3.0;
    add_darcy_band(&mut net, third, 2.0 * third).expect("band");
    net
}

fn bench_statoil_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("statoil_render");
    group
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASURE);
    let cfg = StatoilConfig::default();
    for &side in bench_scales() {
        let net = lattice_with_band(side);
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| export_network(&net, &cfg).expect("export"));
        });
    }
    group.finish();
}

fn bench_table_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_from_tables");
    group
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASURE);
    for &side in bench_scales() {
        let set = tables_from_network(&lattice_with_band(side));
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| network_from_tables(&set).expect("network"));
        });
    }
    group.finish();
}

fn bench_table_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("tables_from_network");
    group
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASURE);
    for &side in bench_scales() {
        let net = lattice_with_band(side);
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| tables_from_network(&net));
        });
    }
    group.finish();
}

fn bench_dump_writer(c: &mut Criterion) {
    let mut group = c.benchmark_group("dump_writer");
    group
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASURE);
    for &side in bench_scales() {
        let net = lattice_with_band(side);
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| {
                let mut buffer = Vec::with_capacity(1 << 20);
                dump_network_to_writer(&net, &mut buffer).expect("dump");
                buffer
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = export_benches;
    config = Criterion::default();
    targets = bench_statoil_render,
        bench_table_conversion,
        bench_table_rendering,
        bench_dump_writer
);
criterion_main!(export_benches);
