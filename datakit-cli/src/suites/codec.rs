//! Codec suites: one per scheme plus the adaptive path.

use datakit_codec::{
    analyze,
    decode_to_vec,
    encode,
    encode_with,
    encoded_size,
    max_encoded_size,
    select,
    Encoding,
    Error,
};
use datakit_types::{
    varint,
    zigzag,
};
use rand::{
    rngs::StdRng,
    Rng,
    SeedableRng,
};

use crate::harness::Checks;

fn round_trip(checks: &mut Checks, encoding: Encoding, values: &[u64], label: &str) {
    let mut buf = vec![0u8; encoding.max_encoded_size(values.len())];
    match encode_with(encoding, values, &mut buf) {
        Ok((written, metadata)) => {
            checks.eq(metadata.encoding(), encoding, label);
            checks.eq(buf[0], encoding.tag(), label);
            match decode_to_vec(&buf[..written], values.len()) {
                Ok((decoded, consumed)) => {
                    checks.eq(consumed, written, label);
                    checks.check(decoded == values, label);
                }
                Err(err) => checks.check(false, &format!("{label}: decode failed: {err}")),
            }
            checks.eq(
                encoded_size(&buf[..written], values.len()),
                Ok(written),
                label,
            );
        }
        Err(err) => checks.check(false, &format!("{label}: encode failed: {err}")),
    }
}

fn shapes(rng: &mut StdRng) -> Vec<(&'static str, Vec<u64>)> {
    vec![
        ("empty", Vec::new()),
        ("singleton", vec![rng.gen()]),
        ("all-equal", vec![777; 256]),
        ("ascending", (0..1000u64).map(|i| 40_000 + i * 5).collect()),
        ("descending", (0..1000u64).rev().map(|i| 40_000 + i * 5).collect()),
        ("random", (0..512).map(|_| rng.gen()).collect()),
        (
            "clustered",
            (0..512).map(|_| 9_000_000 + rng.gen_range(0..2_000)).collect(),
        ),
    ]
}

pub fn varint(checks: &mut Checks) {
    let mut buf = [0u8; varint::MAX_SIZE];
    for shift in 0..64 {
        let value = 1u64 << shift;
        for probe in [value - 1, value, value + 1] {
            let written = varint::encode(probe, &mut buf).expect("buffer is MAX_SIZE");
            checks.eq(varint::size(probe), written, "varint size");
            checks.eq(varint::decode(&buf), Ok((probe, written)), "varint round trip");
        }
    }
    checks.eq(varint::size(0), 1, "zero is one byte");
    checks.eq(varint::size(u64::MAX), varint::MAX_SIZE, "max is nine bytes");
    for value in [0i64, -1, 1, i64::MIN, i64::MAX] {
        checks.eq(zigzag::decode(zigzag::encode(value)), value, "zigzag fold");
    }
}

pub fn delta(checks: &mut Checks) {
    let mut rng = StdRng::seed_from_u64(11);
    for (label, values) in shapes(&mut rng) {
        round_trip(checks, Encoding::Delta, &values, label);
    }
    // A gently increasing run encodes to almost nothing.
    let run = [100u64, 102, 103, 105, 110, 115, 120];
    let mut buf = [0u8; 64];
    let (written, _) = encode_with(Encoding::Delta, &run, &mut buf).expect("encode");
    checks.check(written <= 16, "sorted run stays under 16 bytes");
}

pub fn frame(checks: &mut Checks) {
    let mut rng = StdRng::seed_from_u64(12);
    for (label, values) in shapes(&mut rng) {
        round_trip(checks, Encoding::For, &values, label);
    }
}

pub fn patched(checks: &mut Checks) {
    let mut rng = StdRng::seed_from_u64(13);
    for (label, values) in shapes(&mut rng) {
        round_trip(checks, Encoding::Pfor, &values, label);
    }
    // Clustered data with rare spikes is the scheme's home turf: the
    // packed block should stay near the cluster's width.
    let mut values: Vec<u64> = (0..2_000).map(|_| 600_000 + rng.gen_range(0..1_024)).collect();
    values[17] = u64::MAX / 2;
    values[999] = u64::MAX / 3;
    let mut buf = vec![0u8; Encoding::Pfor.max_encoded_size(values.len())];
    let (written, _) = encode_with(Encoding::Pfor, &values, &mut buf).expect("encode");
    checks.check(written < 2_000 * 3, "exceptions stay out of band");
    let (decoded, _) = decode_to_vec(&buf[..written], values.len()).expect("decode");
    checks.check(decoded == values, "patched round trip");
}

pub fn dict(checks: &mut Checks) {
    let mut rng = StdRng::seed_from_u64(14);
    for (label, values) in shapes(&mut rng) {
        round_trip(checks, Encoding::Dict, &values, label);
    }
    let cycled: Vec<u64> = (0..200).map(|i| [200, 404, 500, 304, 403][i % 5]).collect();
    let mut buf = vec![0u8; Encoding::Dict.max_encoded_size(cycled.len())];
    let (written, _) = encode_with(Encoding::Dict, &cycled, &mut buf).expect("encode");
    checks.check(written < 200 * 8 / 3, "five symbols compress well");
}

pub fn bitmap(checks: &mut Checks) {
    let ascending: Vec<u64> = (500..3_000).collect();
    round_trip(checks, Encoding::Bitmap, &ascending, "ascending");
    round_trip(checks, Encoding::Bitmap, &[], "empty");
    round_trip(checks, Encoding::Bitmap, &[65_535], "edge value");

    let mut buf = vec![0u8; 16 * 1024];
    checks.eq(
        encode_with(Encoding::Bitmap, &[1, 1], &mut buf).err(),
        Some(Error::NotAscending),
        "duplicates rejected",
    );
    checks.eq(
        encode_with(Encoding::Bitmap, &[100_000], &mut buf).err(),
        Some(Error::ValueOutOfDomain(100_000)),
        "domain enforced",
    );
}

pub fn tagged(checks: &mut Checks) {
    let mut rng = StdRng::seed_from_u64(15);
    for (label, values) in shapes(&mut rng) {
        round_trip(checks, Encoding::Tagged, &values, label);
    }
    let mut out = Vec::new();
    checks.eq(
        datakit_codec::decode(&[0x3f], 1, &mut out).err(),
        Some(Error::UnknownTag(0x3f)),
        "unknown tag",
    );
}

pub fn adaptive(checks: &mut Checks) {
    let mut rng = StdRng::seed_from_u64(16);
    for (label, values) in shapes(&mut rng) {
        let chosen = select(&analyze(&values));
        let mut buf = vec![0u8; max_encoded_size(values.len())];
        match encode(&values, &mut buf) {
            Ok((written, metadata)) => {
                checks.eq(metadata.encoding(), chosen, label);
                checks.eq(buf[0], chosen.tag(), label);
                match decode_to_vec(&buf[..written], values.len()) {
                    Ok((decoded, _)) => checks.check(decoded == values, label),
                    Err(err) => {
                        checks.check(false, &format!("{label}: decode failed: {err}"))
                    }
                }
            }
            Err(err) => checks.check(false, &format!("{label}: encode failed: {err}")),
        }
    }
    // The empty array is one tag byte.
    let mut buf = [0u8; 4];
    let (written, _) = encode(&[], &mut buf).expect("empty encode");
    checks.eq(written, 1, "empty input is a single tag byte");
}
