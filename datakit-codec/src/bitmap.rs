//! Bitmap payload: the bitmap-set wire format over the 16-bit domain.
//!
//! Stores a set, so it only accepts what reads as one: strictly ascending
//! values that all fit in sixteen bits.

use alloc::vec::Vec;

use datakit_bitmap::{
    serialize,
    Bitmap,
};

use crate::{
    Error,
    Metadata,
};

pub(crate) fn encode(values: &[u64], dst: &mut [u8]) -> Result<(usize, Metadata), Error> {
    let mut previous: Option<u64> = None;
    for &value in values {
        if value > u64::from(u16::MAX) {
            return Err(Error::ValueOutOfDomain(value));
        }
        if previous.map_or(false, |p| p >= value) {
            return Err(Error::NotAscending);
        }
        previous = Some(value);
    }
    let set = Bitmap::from_sorted_iter(values.iter().map(|&v| v as u16))
        .map_err(Error::from)?;
    let written = set.serialize(dst)?;
    Ok((
        written,
        Metadata::Bitmap {
            kind: set.stats().kind,
        },
    ))
}

pub(crate) fn decode(src: &[u8], count: usize, out: &mut Vec<u64>) -> Result<usize, Error> {
    let (set, consumed) = Bitmap::deserialize(src)?;
    if set.cardinality() as usize != count {
        return Err(Error::CountMismatch {
            expected: count as u64,
            actual: u64::from(set.cardinality()),
        });
    }
    out.extend(set.iter().map(u64::from));
    Ok(consumed)
}

pub(crate) fn size(src: &[u8]) -> Result<usize, Error> {
    let total = serialize::peek_len(src)?;
    if total > src.len() {
        return Err(Error::UnexpectedEnd);
    }
    Ok(total)
}
