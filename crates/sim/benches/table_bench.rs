use hapdyn_sim::evolution::{RecombinationMap, RecombinationTable, RecombinationTableBuilder};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn bench_table_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_build");
    group.sample_size(20);

    for loci in [4, 6, 8] {
        let map = RecombinationMap::uniform(loci, 0.1).unwrap();
        // Stored entries grow as N * 3^L.
        group.throughput(Throughput::Elements((1u64 << loci) * 3u64.pow(loci as u32)));

        group.bench_with_input(BenchmarkId::new("parallel", loci), &map, |b, map| {
            b.iter(|| {
                black_box(
                    RecombinationTableBuilder::new(loci, map.clone())
                        .unwrap()
                        .build()
                        .unwrap(),
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("sequential", loci), &map, |b, map| {
            b.iter(|| {
                black_box(
                    RecombinationTableBuilder::new(loci, map.clone())
                        .unwrap()
                        .parallel(false)
                        .build()
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

fn bench_mask_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_enumeration");
    group.sample_size(10);

    for loci in [4, 6] {
        let map = RecombinationMap::uniform(loci, 0.1).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(loci), &map, |b, map| {
            b.iter(|| black_box(RecombinationTable::by_mask_enumeration(map).unwrap()))
        });
    }

    group.finish();
}

fn bench_table_checks(c: &mut Criterion) {
    let table = RecombinationTable::build(8, &[0.2; 7]).unwrap();
    let mut group = c.benchmark_group("table_checks");
    group.bench_function("conservation_error", |b| {
        b.iter(|| black_box(table.conservation_error()))
    });
    group.bench_function("symmetry_error", |b| b.iter(|| black_box(table.symmetry_error())));
    group.finish();
}

criterion_group!(
    benches,
    bench_table_build,
    bench_mask_enumeration,
    bench_table_checks
);
criterion_main!(benches);
