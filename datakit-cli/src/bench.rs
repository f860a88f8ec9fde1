//! Named micro-benchmarks with plain wall-clock timing.

use std::time::Instant;

use datakit_bitmap::Bitmap;
use datakit_codec::{
    decode_to_vec,
    encode,
    max_encoded_size,
};
use datakit_wheel::Wheel;
use rand::{
    rngs::StdRng,
    Rng,
    SeedableRng,
};

struct Bench {
    name: &'static str,
    run: fn() -> (u64, u64),
}

const BENCHES: &[Bench] = &[
    Bench {
        name: "codec-encode",
        run: codec_encode,
    },
    Bench {
        name: "codec-decode",
        run: codec_decode,
    },
    Bench {
        name: "bitmap-insert",
        run: bitmap_insert,
    },
    Bench {
        name: "bitmap-boolean",
        run: bitmap_boolean,
    },
    Bench {
        name: "wheel-advance",
        run: wheel_advance,
    },
];

/// Run the named benchmark, printing iterations and ns/op. Returns the
/// unknown name on a miss.
pub fn run(name: &str) -> Result<(), String> {
    let bench = BENCHES
        .iter()
        .find(|bench| bench.name == name)
        .ok_or_else(|| name.to_owned())?;
    let (iters, nanos) = (bench.run)();
    println!(
        "{}: {} iters, {} ns/op",
        bench.name,
        iters,
        nanos / iters.max(1)
    );
    Ok(())
}

fn clustered(count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(31);
    (0..count).map(|_| 7_000_000 + rng.gen_range(0..4_096)).collect()
}

fn codec_encode() -> (u64, u64) {
    let values = clustered(8_192);
    let mut buf = vec![0u8; max_encoded_size(values.len())];
    let iters = 500;
    let start = Instant::now();
    for _ in 0..iters {
        let (written, _) = encode(&values, &mut buf).expect("encode");
        std::hint::black_box(written);
    }
    (iters, start.elapsed().as_nanos() as u64)
}

fn codec_decode() -> (u64, u64) {
    let values = clustered(8_192);
    let mut buf = vec![0u8; max_encoded_size(values.len())];
    let (written, _) = encode(&values, &mut buf).expect("encode");
    let encoded = &buf[..written];
    let iters = 500;
    let start = Instant::now();
    for _ in 0..iters {
        let (decoded, _) = decode_to_vec(encoded, values.len()).expect("decode");
        std::hint::black_box(decoded.len());
    }
    (iters, start.elapsed().as_nanos() as u64)
}

fn bitmap_insert() -> (u64, u64) {
    let mut rng = StdRng::seed_from_u64(32);
    let values: Vec<u16> = (0..65_536).map(|_| rng.gen()).collect();
    let iters = 100;
    let start = Instant::now();
    for _ in 0..iters {
        let mut set = Bitmap::new();
        for &value in &values {
            set.insert(value);
        }
        std::hint::black_box(set.cardinality());
    }
    (iters, start.elapsed().as_nanos() as u64)
}

fn bitmap_boolean() -> (u64, u64) {
    let mut rng = StdRng::seed_from_u64(33);
    let x: Bitmap = (0..20_000).map(|_| rng.gen::<u16>()).collect();
    let y: Bitmap = (0..20_000).map(|_| rng.gen::<u16>()).collect();
    let iters = 2_000;
    let start = Instant::now();
    for _ in 0..iters {
        std::hint::black_box(x.and(&y).cardinality());
        std::hint::black_box(x.or(&y).cardinality());
    }
    (iters, start.elapsed().as_nanos() as u64)
}

fn wheel_advance() -> (u64, u64) {
    let iters = 50;
    let start = Instant::now();
    for round in 0..iters {
        let mut wheel = Wheel::new();
        let mut rng = StdRng::seed_from_u64(34 + round);
        for _ in 0..10_000 {
            wheel
                .register(rng.gen_range(1_000..60_000_000), 0, |_, _| false)
                .expect("register");
        }
        let mut fired = 0;
        let mut now = 0;
        while fired < 10_000 {
            now += 250_000;
            fired += wheel.advance(now).expect("advance");
        }
        std::hint::black_box(fired);
    }
    (iters, start.elapsed().as_nanos() as u64)
}
