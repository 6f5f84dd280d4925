use bitfec::{ConcatenatedCode, HammingCode, NoisyChannel, RepetitionCode};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const SIZES: [usize; 3] = [64, 1024, 16 * 1024];

fn random_data(len: usize) -> Vec<u8> {
    let mut rng = ChaCha20Rng::seed_from_u64(len as u64);
    (0..len).map(|_| rng.gen()).collect()
}

fn bench_hamming(c: &mut Criterion) {
    let mut group = c.benchmark_group("hamming_7_4");
    let hamming = HammingCode::new();

    for size in SIZES {
        let data = random_data(size);
        let encoded = hamming.encode(&data).unwrap();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            b.iter(|| hamming.encode(black_box(data)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, encoded| {
            b.iter(|| hamming.decode(black_box(encoded)).unwrap())
        });
    }

    group.finish();
}

fn bench_repetition(c: &mut Criterion) {
    let mut group = c.benchmark_group("repetition");
    let data = random_data(1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for degree in [3, 5, 7] {
        let code = RepetitionCode::new(degree).unwrap();
        let encoded = code.encode(&data).unwrap();

        group.bench_with_input(BenchmarkId::new("encode", degree), &data, |b, data| {
            b.iter(|| code.encode(black_box(data)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", degree), &encoded, |b, encoded| {
            b.iter(|| code.decode(black_box(encoded)).unwrap())
        });
    }

    group.finish();
}

fn bench_concatenated_over_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("concatenated");
    let data = random_data(1024);
    let code = ConcatenatedCode::new(3).unwrap();
    let mut channel = NoisyChannel::with_seed(0.05, 1).unwrap();
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("encode_transmit_decode", |b| {
        b.iter(|| {
            let encoded = code.encode(black_box(&data)).unwrap();
            let received = channel.transmit(&encoded).unwrap();
            code.decode_exact(&received, data.len()).unwrap()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_hamming,
    bench_repetition,
    bench_concatenated_over_noise
);
criterion_main!(benches);
