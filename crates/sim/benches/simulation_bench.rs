use hapdyn_sim::base::{FitnessVector, FrequencyVector, GenotypeSpace};
use hapdyn_sim::evolution::{MatingTableProvider, RandomMating, RecombinationTable, SimilarityMating};
use hapdyn_sim::simulation::{InitialCondition, SimulationBuilder, step};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation_step");

    for loci in [4, 6, 8, 10] {
        let space = GenotypeSpace::new(loci).unwrap();
        let table = RecombinationTable::build(loci, &vec![0.1; loci - 1]).unwrap();
        let fitness = FitnessVector::neutral(space);
        let freqs = FrequencyVector::uniform(space);
        group.throughput(Throughput::Elements(table.nnz() as u64));

        group.bench_with_input(BenchmarkId::new("random_mating", loci), &freqs, |b, f| {
            b.iter(|| black_box(step(f, &fitness, &table, &RandomMating).unwrap()))
        });
    }

    group.finish();
}

fn bench_mating_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("mating_table");
    let space = GenotypeSpace::new(8).unwrap();
    let freqs = FrequencyVector::uniform(space);
    let similarity = SimilarityMating::new(0.2).unwrap();

    group.bench_function("random", |b| {
        b.iter(|| black_box(RandomMating.mating_table(&freqs).unwrap()))
    });
    group.bench_function("similarity", |b| {
        b.iter(|| black_box(similarity.mating_table(&freqs).unwrap()))
    });

    group.finish();
}

fn bench_trials(c: &mut Criterion) {
    let mut group = c.benchmark_group("trials");
    group.sample_size(10);

    group.bench_function("corners_l4", |b| {
        b.iter_batched(
            || {
                SimulationBuilder::new()
                    .loci(4)
                    .uniform_recombination(0.2)
                    .initial(InitialCondition::Corners)
                    .trials(32)
                    .seed(1)
                    .build()
                    .unwrap()
            },
            |sim| black_box(sim.run_trials()),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_step, bench_mating_tables, bench_trials);
criterion_main!(benches);
