//! Patched frame-of-reference payload.
//!
//! Offsets from the frame minimum are packed at a width chosen to minimize
//! the total encoded size. Offsets at or above the all-ones marker for that
//! width are written as the marker in-band and spilled, in slot order, into
//! a varint sidecar after the packed block.
//!
//! Layout: frame minimum varint, width byte, exception-count varint, packed
//! offsets, exception varints.

use alloc::vec::Vec;

use datakit_types::{
    bytes,
    varint,
};

use crate::{
    error::{
        rd,
        wr,
    },
    pack,
    Error,
    Metadata,
};

/// Pick the width minimizing packed bytes plus exception bytes.
fn choose_width(sorted_offsets: &[u64]) -> u8 {
    let count = sorted_offsets.len();
    // suffix[i] = total varint bytes of sorted_offsets[i..]
    let mut suffix = Vec::with_capacity(count + 1);
    suffix.push(0usize);
    for &offset in sorted_offsets.iter().rev() {
        let last = *suffix.last().unwrap_or(&0);
        suffix.push(last + varint::size(offset));
    }
    suffix.reverse();

    let mut best_width = 1u8;
    let mut best_cost = usize::MAX;
    for width in 1..=64u8 {
        let marker = pack::ones(width);
        let fitting = sorted_offsets.partition_point(|&offset| offset < marker);
        let exceptions = count - fitting;
        let cost = bytes::packed_len(width, count)
            + suffix[fitting]
            + varint::size(exceptions as u64);
        if cost < best_cost {
            best_cost = cost;
            best_width = width;
        }
    }
    best_width
}

pub(crate) fn encode(values: &[u64], dst: &mut [u8]) -> Result<(usize, Metadata), Error> {
    let min = values.iter().copied().min().unwrap_or(0);
    let mut sorted: Vec<u64> = values.iter().map(|&v| v - min).collect();
    sorted.sort_unstable();
    let width = choose_width(&sorted);
    let marker = pack::ones(width);
    let exceptions = values.iter().filter(|&&v| v - min >= marker).count() as u64;

    let mut at = varint::encode(min, dst).map_err(wr)?;
    at += bytes::store_u8(&mut dst[at..], width).map_err(wr)?;
    at += varint::encode(exceptions, &mut dst[at..]).map_err(wr)?;
    at += pack::pack(
        values.iter().map(|&v| (v - min).min(marker)),
        width,
        &mut dst[at..],
    )?;
    for &value in values {
        let offset = value - min;
        if offset >= marker {
            at += varint::encode(offset, &mut dst[at..]).map_err(wr)?;
        }
    }
    Ok((
        at,
        Metadata::Pfor {
            min,
            width,
            exceptions,
            threshold: marker,
        },
    ))
}

pub(crate) fn decode(src: &[u8], count: usize, out: &mut Vec<u64>) -> Result<usize, Error> {
    let (min, mut at) = varint::decode(src).map_err(rd)?;
    let (width, used) = bytes::read_u8(&src[at..]).map_err(rd)?;
    at += used;
    if width == 0 || width > 64 {
        return Err(Error::InvalidWidth(width));
    }
    let (exceptions, used) = varint::decode(&src[at..]).map_err(rd)?;
    at += used;
    let marker = pack::ones(width);

    let start = out.len();
    let mut patch_slots = Vec::new();
    at += pack::unpack(&src[at..], width, count, |offset| {
        if offset == marker {
            patch_slots.push(out.len());
        }
        out.push(offset);
    })?;
    if patch_slots.len() as u64 != exceptions {
        return Err(Error::Malformed);
    }
    for slot in patch_slots {
        let (offset, used) = varint::decode(&src[at..]).map_err(rd)?;
        at += used;
        if offset < marker {
            // An exception that would have fit inline is nonsense.
            return Err(Error::Malformed);
        }
        out[slot] = offset;
    }
    for value in &mut out[start..] {
        *value = min.checked_add(*value).ok_or(Error::Malformed)?;
    }
    Ok(at)
}

pub(crate) fn size(src: &[u8], count: usize) -> Result<usize, Error> {
    let first = *src.first().ok_or(Error::UnexpectedEnd)?;
    let mut at = varint::peek_size(first).map_err(rd)?;
    let (width, used) = bytes::read_u8(src.get(at..).ok_or(Error::UnexpectedEnd)?).map_err(rd)?;
    at += used;
    if width == 0 || width > 64 {
        return Err(Error::InvalidWidth(width));
    }
    let (exceptions, used) =
        varint::decode(src.get(at..).ok_or(Error::UnexpectedEnd)?).map_err(rd)?;
    at += used;
    at += bytes::packed_len(width, count);
    for _ in 0..exceptions {
        let first = *src.get(at).ok_or(Error::UnexpectedEnd)?;
        at += varint::peek_size(first).map_err(rd)?;
    }
    if at > src.len() {
        return Err(Error::UnexpectedEnd);
    }
    Ok(at)
}
