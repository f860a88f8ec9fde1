//! System benchmark: stream values through the adaptive codec and report
//! throughput over the raw input bytes.

use std::time::Instant;

use datakit_codec::{
    decode_to_vec,
    encode,
    max_encoded_size,
};
use rand::{
    rngs::StdRng,
    Rng,
    SeedableRng,
};
use serde::Serialize;

const DEFAULT_MB: usize = 16;
const DEFAULT_ITERS: usize = 3;
const BLOCK_VALUES: usize = 8_192;

/// Output rendering for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
    Csv,
}

impl Format {
    pub fn from_flags(json: bool, csv: bool) -> Self {
        if json {
            Format::Json
        } else if csv {
            Format::Csv
        } else {
            Format::Human
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    mb: usize,
    iters: usize,
    encoded_bytes: usize,
    ratio: f64,
    encode_mb_s: f64,
    decode_mb_s: f64,
}

pub fn run(format: Format, mb: Option<usize>, iters: Option<usize>) {
    let mb = mb.unwrap_or(DEFAULT_MB).max(1);
    let iters = iters.unwrap_or(DEFAULT_ITERS).max(1);
    let total_values = mb * 1024 * 1024 / 8;

    // A mix of the shapes the selector routes differently.
    let mut rng = StdRng::seed_from_u64(41);
    let values: Vec<u64> = (0..total_values)
        .map(|at| match at / BLOCK_VALUES % 3 {
            0 => 3_000_000 + at as u64,
            1 => 9_000_000 + rng.gen_range(0..4_096),
            _ => [100, 200, 300, 404, 500][rng.gen_range(0..5)],
        })
        .collect();
    let raw_bytes = values.len() * 8;

    let mut buf = vec![0u8; max_encoded_size(BLOCK_VALUES)];
    let mut encoded_bytes = 0;
    let mut best_encode = f64::MAX;
    let mut best_decode = f64::MAX;

    for _ in 0..iters {
        encoded_bytes = 0;
        let start = Instant::now();
        for block in values.chunks(BLOCK_VALUES) {
            let (written, _) = encode(block, &mut buf).expect("encode");
            encoded_bytes += written;
        }
        best_encode = best_encode.min(start.elapsed().as_secs_f64());

        let mut blocks = Vec::with_capacity(values.len() / BLOCK_VALUES + 1);
        for block in values.chunks(BLOCK_VALUES) {
            let (written, _) = encode(block, &mut buf).expect("encode");
            blocks.push((buf[..written].to_vec(), block.len()));
        }
        let start = Instant::now();
        for (encoded, count) in &blocks {
            let (decoded, _) = decode_to_vec(encoded, *count).expect("decode");
            std::hint::black_box(decoded.len());
        }
        best_decode = best_decode.min(start.elapsed().as_secs_f64());
    }

    let report = Report {
        mb,
        iters,
        encoded_bytes,
        ratio: encoded_bytes as f64 / raw_bytes as f64,
        encode_mb_s: raw_bytes as f64 / (1024.0 * 1024.0) / best_encode,
        decode_mb_s: raw_bytes as f64 / (1024.0 * 1024.0) / best_decode,
    };

    match format {
        Format::Human => {
            println!("speed: {} MB x {} iters", report.mb, report.iters);
            println!(
                "  encoded {} bytes (ratio {:.3})",
                report.encoded_bytes, report.ratio
            );
            println!("  encode {:.1} MB/s", report.encode_mb_s);
            println!("  decode {:.1} MB/s", report.decode_mb_s);
        }
        Format::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).expect("report serializes")
            );
        }
        Format::Csv => {
            println!("mb,iters,encoded_bytes,ratio,encode_mb_s,decode_mb_s");
            println!(
                "{},{},{},{:.4},{:.1},{:.1}",
                report.mb,
                report.iters,
                report.encoded_bytes,
                report.ratio,
                report.encode_mb_s,
                report.decode_mb_s
            );
        }
    }
}
