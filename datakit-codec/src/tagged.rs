//! Tagged-varint payload: one self-describing varint per value.

use alloc::vec::Vec;

use datakit_types::varint;

use crate::{
    error::{
        rd,
        wr,
    },
    Error,
    Metadata,
};

pub(crate) fn encode(values: &[u64], dst: &mut [u8]) -> Result<(usize, Metadata), Error> {
    let mut at = 0;
    for &value in values {
        at += varint::encode(value, &mut dst[at..]).map_err(wr)?;
    }
    Ok((at, Metadata::Tagged))
}

pub(crate) fn decode(src: &[u8], count: usize, out: &mut Vec<u64>) -> Result<usize, Error> {
    let mut at = 0;
    for _ in 0..count {
        let (value, used) = varint::decode(&src[at..]).map_err(rd)?;
        at += used;
        out.push(value);
    }
    Ok(at)
}

/// Payload size of `count` consecutive varints, from their first bytes
/// alone. Shared with the delta payload, which is also a varint run.
pub(crate) fn size(src: &[u8], count: usize) -> Result<usize, Error> {
    let mut at = 0;
    for _ in 0..count {
        let first = *src.get(at).ok_or(Error::UnexpectedEnd)?;
        at += varint::peek_size(first).map_err(rd)?;
    }
    if at > src.len() {
        return Err(Error::UnexpectedEnd);
    }
    Ok(at)
}
