//! Dictionary payload: sorted table of distinct values, then packed indices.

use alloc::vec::Vec;

use datakit_types::{
    bytes,
    varint,
};
use hashbrown::HashMap;

use crate::{
    error::{
        rd,
        wr,
    },
    pack,
    Error,
    Metadata,
};

fn index_width(table_len: usize) -> u8 {
    if table_len <= 1 {
        1
    } else {
        bytes::bit_width(table_len as u64 - 1)
    }
}

pub(crate) fn encode(values: &[u64], dst: &mut [u8]) -> Result<(usize, Metadata), Error> {
    let mut table: Vec<u64> = values.to_vec();
    table.sort_unstable();
    table.dedup();
    let index: HashMap<u64, u64> = table
        .iter()
        .enumerate()
        .map(|(at, &value)| (value, at as u64))
        .collect();
    let width = index_width(table.len());

    let mut at = varint::encode(table.len() as u64, dst).map_err(wr)?;
    for &value in &table {
        at += varint::encode(value, &mut dst[at..]).map_err(wr)?;
    }
    at += bytes::store_u8(&mut dst[at..], width).map_err(wr)?;
    at += pack::pack(values.iter().map(|v| index[v]), width, &mut dst[at..])?;
    Ok((
        at,
        Metadata::Dict {
            distinct: table.len() as u64,
            width,
        },
    ))
}

pub(crate) fn decode(src: &[u8], count: usize, out: &mut Vec<u64>) -> Result<usize, Error> {
    let (table_len, mut at) = varint::decode(src).map_err(rd)?;
    // Every table entry takes at least one byte.
    if table_len > src.len() as u64 {
        return Err(Error::Malformed);
    }
    let table_len = table_len as usize;
    let mut table = Vec::with_capacity(table_len);
    for _ in 0..table_len {
        let (value, used) = varint::decode(&src[at..]).map_err(rd)?;
        at += used;
        if table.last().map_or(false, |&previous| previous >= value) {
            return Err(Error::Malformed);
        }
        table.push(value);
    }
    let (width, used) = bytes::read_u8(&src[at..]).map_err(rd)?;
    at += used;
    if width == 0 || width > 64 {
        return Err(Error::InvalidWidth(width));
    }
    let mut bad_index = false;
    at += pack::unpack(&src[at..], width, count, |index| {
        match table.get(index as usize) {
            Some(&value) => out.push(value),
            None => bad_index = true,
        }
    })?;
    if bad_index {
        return Err(Error::Malformed);
    }
    Ok(at)
}

pub(crate) fn size(src: &[u8], count: usize) -> Result<usize, Error> {
    let (table_len, mut at) = varint::decode(src).map_err(rd)?;
    if table_len > src.len() as u64 {
        return Err(Error::Malformed);
    }
    for _ in 0..table_len {
        let first = *src.get(at).ok_or(Error::UnexpectedEnd)?;
        at += varint::peek_size(first).map_err(rd)?;
    }
    let (width, used) = bytes::read_u8(src.get(at..).ok_or(Error::UnexpectedEnd)?).map_err(rd)?;
    at += used;
    if width == 0 || width > 64 {
        return Err(Error::InvalidWidth(width));
    }
    let total = at + bytes::packed_len(width, count);
    if total > src.len() {
        return Err(Error::UnexpectedEnd);
    }
    Ok(total)
}
