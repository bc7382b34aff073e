use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hapdyn_codec::{CodecStrategy, encode_f64s};
use rand::Rng;
use std::hint::black_box;

fn bench_codecs(c: &mut Criterion) {
    let mut rng = rand::rng();

    let strategies = [("plain", CodecStrategy::Plain), ("zstd", CodecStrategy::Zstd)];

    // Frequency vectors for 4, 8 and 12 loci.
    for loci in [4u32, 8, 12] {
        let n = 1usize << loci;
        let freqs: Vec<f64> = (0..n).map(|_| rng.random::<f64>()).collect();
        let input = encode_f64s(&freqs);

        let mut group = c.benchmark_group(format!("encode_L{loci}"));
        group.throughput(Throughput::Bytes(input.len() as u64));
        for (name, strategy) in &strategies {
            group.bench_with_input(BenchmarkId::new(*name, n), &input, |b, i| {
                b.iter(|| strategy.encode(black_box(i)).unwrap())
            });
        }
        group.finish();

        let mut group = c.benchmark_group(format!("decode_L{loci}"));
        group.throughput(Throughput::Bytes(input.len() as u64));
        for (name, strategy) in &strategies {
            let encoded = strategy.encode(&input).unwrap();
            group.bench_with_input(BenchmarkId::new(*name, n), &encoded, |b, e| {
                b.iter(|| strategy.decode(black_box(e)).unwrap())
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_codecs);
criterion_main!(benches);
