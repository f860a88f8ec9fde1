//! Frame-of-reference payload: frame minimum, bit width, packed offsets.

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

pub(crate) fn encode(values: &[u64], dst: &mut [u8]) -> Result<(usize, Metadata), Error> {
    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);
    let width = bytes::bit_width(max - min);
    let mut at = varint::encode(min, dst).map_err(wr)?;
    at += bytes::store_u8(&mut dst[at..], width).map_err(wr)?;
    at += pack::pack(values.iter().map(|&v| v - min), width, &mut dst[at..])?;
    Ok((at, Metadata::For { min, width }))
}

pub(crate) fn decode(src: &[u8], count: usize, out: &mut Vec<u64>) -> Result<usize, Error> {
    let (min, mut at) = varint::decode(src).map_err(rd)?;
    let (width, used) = bytes::read_u8(&src[at..]).map_err(rd)?;
    at += used;
    if width > 64 {
        return Err(Error::InvalidWidth(width));
    }
    let mut overflow = false;
    at += pack::unpack(&src[at..], width, count, |offset| {
        match min.checked_add(offset) {
            Some(value) => out.push(value),
            None => overflow = true,
        }
    })?;
    if overflow {
        return Err(Error::Malformed);
    }
    Ok(at)
}

pub(crate) fn size(src: &[u8], count: usize) -> Result<usize, Error> {
    let first = *src.first().ok_or(Error::UnexpectedEnd)?;
    let mut at = varint::peek_size(first).map_err(rd)?;
    let (width, used) = bytes::read_u8(src.get(at..).ok_or(Error::UnexpectedEnd)?).map_err(rd)?;
    at += used;
    if width > 64 {
        return Err(Error::InvalidWidth(width));
    }
    let total = at + bytes::packed_len(width, count);
    if total > src.len() {
        return Err(Error::UnexpectedEnd);
    }
    Ok(total)
}
