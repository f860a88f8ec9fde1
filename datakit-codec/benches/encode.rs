use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    BenchmarkId,
    Criterion,
    Throughput,
};
use datakit_codec::{
    decode_to_vec,
    encode,
    encode_with,
    max_encoded_size,
    Encoding,
};
use rand::{
    rngs::StdRng,
    Rng,
    SeedableRng,
};

const COUNT: usize = 8192;

fn inputs() -> Vec<(&'static str, Vec<u64>)> {
    let mut rng = StdRng::seed_from_u64(0x00da_7a41);
    vec![
        ("sorted", (0..COUNT as u64).map(|i| 1_000_000 + i * 3).collect()),
        (
            "clustered",
            (0..COUNT).map(|_| 5_000_000 + rng.gen_range(0..4096)).collect(),
        ),
        (
            "repetitive",
            (0..COUNT).map(|_| [301u64, 404, 500, 200][rng.gen_range(0..4)]).collect(),
        ),
        ("random", (0..COUNT).map(|_| rng.gen()).collect()),
    ]
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes((COUNT * 8) as u64));

    for (shape, values) in inputs() {
        let mut buf = vec![0u8; max_encoded_size(values.len())];
        group.bench_with_input(BenchmarkId::new("encode", shape), &values, |b, values| {
            b.iter(|| {
                let (written, _) = encode(black_box(values), &mut buf).unwrap();
                black_box(written);
            })
        });

        let (written, _) = encode(&values, &mut buf).unwrap();
        let encoded = &buf[..written];
        group.bench_with_input(BenchmarkId::new("decode", shape), &encoded, |b, encoded| {
            b.iter(|| {
                let (decoded, _) = decode_to_vec(black_box(encoded), COUNT).unwrap();
                black_box(decoded);
            })
        });
    }

    let sorted: Vec<u64> = (0..COUNT as u64).map(|i| 1_000_000 + i * 3).collect();
    for encoding in [Encoding::Delta, Encoding::For, Encoding::Pfor, Encoding::Tagged] {
        let mut buf = vec![0u8; encoding.max_encoded_size(COUNT)];
        group.bench_function(BenchmarkId::new("encode_with", encoding.name()), |b| {
            b.iter(|| {
                let (written, _) =
                    encode_with(encoding, black_box(&sorted), &mut buf).unwrap();
                black_box(written);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
