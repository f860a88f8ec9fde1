//! Delta payload: the first value verbatim, then ZigZag-folded wrapping
//! differences between neighbors, each as a varint.

use alloc::vec::Vec;

use datakit_types::{
    varint,
    zigzag,
};

use crate::{
    error::{
        rd,
        wr,
    },
    Error,
    Metadata,
};

pub(crate) fn encode(values: &[u64], dst: &mut [u8]) -> Result<(usize, Metadata), Error> {
    let Some((&base, rest)) = values.split_first() else {
        return Ok((0, Metadata::Delta { base: 0 }));
    };
    let mut at = varint::encode(base, dst).map_err(wr)?;
    let mut previous = base;
    for &value in rest {
        // Wrapping keeps the fold a bijection even across u64 extremes.
        let delta = zigzag::encode(value.wrapping_sub(previous) as i64);
        at += varint::encode(delta, &mut dst[at..]).map_err(wr)?;
        previous = value;
    }
    Ok((at, Metadata::Delta { base }))
}

pub(crate) fn decode(src: &[u8], count: usize, out: &mut Vec<u64>) -> Result<usize, Error> {
    if count == 0 {
        return Ok(0);
    }
    let (base, mut at) = varint::decode(src).map_err(rd)?;
    out.push(base);
    let mut previous = base;
    for _ in 1..count {
        let (folded, used) = varint::decode(&src[at..]).map_err(rd)?;
        at += used;
        previous = previous.wrapping_add(zigzag::decode(folded) as u64);
        out.push(previous);
    }
    Ok(at)
}
