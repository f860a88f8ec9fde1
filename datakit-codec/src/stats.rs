//! Single-pass input analysis feeding the adaptive selector.

use datakit_types::bytes::bit_width;
use hashbrown::HashSet;

use crate::Encoding;

/// How many consecutive-delta multiples of the expected spacing a delta may
/// reach before it counts as an outlier.
const OUTLIER_FACTOR: u64 = 4;

/// Statistics gathered in one pass over a value array.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Stats {
    /// Number of values.
    pub count: usize,
    /// Smallest value; zero for empty input.
    pub min: u64,
    /// Largest value; zero for empty input.
    pub max: u64,
    /// `max - min`.
    pub range: u64,
    /// Number of distinct values.
    pub distinct: usize,
    /// `distinct / count`; zero for empty input.
    pub unique_ratio: f64,
    /// Values never decrease left to right.
    pub sorted: bool,
    /// Values never increase left to right.
    pub reverse_sorted: bool,
    /// Mean absolute consecutive delta.
    pub avg_delta: f64,
    /// Largest absolute consecutive delta.
    pub max_delta: u64,
    /// Consecutive deltas far above the expected spacing.
    pub outliers: usize,
    /// `outliers / (count - 1)`; zero when fewer than two values.
    pub outlier_ratio: f64,
    /// Every value fits the 16-bit bitmap domain.
    pub fits_bitmap: bool,
}

/// Analyze `values` in a single pass.
pub fn analyze(values: &[u64]) -> Stats {
    let count = values.len();
    if count == 0 {
        return Stats {
            count: 0,
            min: 0,
            max: 0,
            range: 0,
            distinct: 0,
            unique_ratio: 0.0,
            sorted: true,
            reverse_sorted: true,
            avg_delta: 0.0,
            max_delta: 0,
            outliers: 0,
            outlier_ratio: 0.0,
            fits_bitmap: false,
        };
    }

    let mut min = u64::MAX;
    let mut max = 0u64;
    let mut sorted = true;
    let mut reverse_sorted = true;
    let mut sum_delta: u128 = 0;
    let mut max_delta = 0u64;
    // Histogram of delta bit widths; resolved against the outlier threshold
    // once the range is known, keeping the analysis a single pass.
    let mut delta_widths = [0usize; 65];
    let mut seen: HashSet<u64> = HashSet::with_capacity(count.min(1 << 16));
    let mut previous: Option<u64> = None;

    for &value in values {
        min = min.min(value);
        max = max.max(value);
        seen.insert(value);
        if let Some(prev) = previous {
            if prev > value {
                sorted = false;
            }
            if prev < value {
                reverse_sorted = false;
            }
            let delta = value.abs_diff(prev);
            sum_delta += u128::from(delta);
            max_delta = max_delta.max(delta);
            delta_widths[bit_width(delta) as usize] += 1;
        }
        previous = Some(value);
    }

    let range = max - min;
    let distinct = seen.len();
    let deltas = count - 1;
    let avg_delta = if deltas == 0 {
        0.0
    } else {
        sum_delta as f64 / deltas as f64
    };
    let spacing = (range / count as u64).max(1);
    let threshold_width = bit_width(OUTLIER_FACTOR.saturating_mul(spacing));
    let outliers: usize = delta_widths[usize::from(threshold_width) + 1..]
        .iter()
        .sum();
    let outlier_ratio = if deltas == 0 {
        0.0
    } else {
        outliers as f64 / deltas as f64
    };

    Stats {
        count,
        min,
        max,
        range,
        distinct,
        unique_ratio: distinct as f64 / count as f64,
        sorted,
        reverse_sorted,
        avg_delta,
        max_delta,
        outliers,
        outlier_ratio,
        fits_bitmap: max <= u64::from(u16::MAX),
    }
}

/// Pick a scheme from the statistics. Pure: the same statistics always
/// yield the same choice.
pub fn select(stats: &Stats) -> Encoding {
    if stats.count <= 1 {
        return Encoding::Tagged;
    }
    if stats.unique_ratio < 0.10 {
        return Encoding::Dict;
    }
    // The bitmap scheme stores a set; it can only reproduce input that
    // already reads as one.
    if stats.fits_bitmap
        && stats.count < 10_000
        && stats.sorted
        && stats.distinct == stats.count
    {
        return Encoding::Bitmap;
    }
    if stats.sorted && stats.avg_delta * stats.count as f64 <= 2.0 * stats.range as f64 {
        return Encoding::Delta;
    }
    if stats.outlier_ratio < 0.05 {
        return Encoding::Pfor;
    }
    if u128::from(stats.range) < stats.count as u128 * 100 {
        return Encoding::For;
    }
    Encoding::Tagged
}
