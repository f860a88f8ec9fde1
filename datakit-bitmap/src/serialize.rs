//! Bitmap wire format.
//!
//! One kind byte, then a kind-specific payload, little-endian throughout:
//!
//! * `0` array — u16 cardinality, then that many sorted u16 values.
//! * `1` bitmap — 8192 raw bytes of bit array.
//! * `2` runs — u16 run count, then (u16 start, u16 length) pairs. The
//!   length field holds the run's element count; the one value it cannot
//!   name (a single 65536-element run) is written as two runs and coalesced
//!   on read.
//!
//! Any kind is accepted on read regardless of what the writer would pick
//! for the same set, and a round trip preserves both the set and the kind.

use alloc::{
    vec,
    vec::Vec,
};

use datakit_types::bytes;

use crate::{
    container::{
        dense,
        runs::Run,
        ArrayContainer,
        Container,
        ContainerKind,
        DenseContainer,
        RunContainer,
    },
    Bitmap,
    Error,
    DENSE_BYTES,
};

fn wr(err: datakit_types::Error) -> Error {
    match err {
        datakit_types::Error::BufferTooShort => Error::BufferTooShort,
        datakit_types::Error::Malformed => Error::Malformed,
    }
}

fn rd(err: datakit_types::Error) -> Error {
    match err {
        datakit_types::Error::BufferTooShort => Error::UnexpectedEnd,
        datakit_types::Error::Malformed => Error::Malformed,
    }
}

/// Runs as they appear on the wire, with the full-domain run split in two.
fn wire_runs(container: &RunContainer) -> impl Iterator<Item = (u16, u32)> + '_ {
    container.runs().iter().flat_map(|run| {
        let len = run.len();
        if len == dense::WORDS as u32 * 64 {
            let half = len / 2;
            [Some((run.start, half)), Some((half as u16, half))]
        } else {
            [Some((run.start, len)), None]
        }
        .into_iter()
        .flatten()
    })
}

impl Bitmap {
    /// Exact size [`serialize`](Bitmap::serialize) will produce.
    pub fn serialized_size(&self) -> usize {
        1 + match &self.container {
            Container::Array(c) => 2 + c.bytes(),
            Container::Dense(_) => DENSE_BYTES,
            Container::Runs(c) => 2 + wire_runs(c).count() * 4,
        }
    }

    /// Write the set into `dst`, returning the bytes written.
    pub fn serialize(&self, dst: &mut [u8]) -> Result<usize, Error> {
        if dst.len() < self.serialized_size() {
            return Err(Error::BufferTooShort);
        }
        let mut at = bytes::store_u8(dst, self.container.kind().tag()).map_err(wr)?;
        match &self.container {
            Container::Array(c) => {
                at += bytes::store_u16(&mut dst[at..], c.cardinality() as u16).map_err(wr)?;
                for &value in c.as_slice() {
                    at += bytes::store_u16(&mut dst[at..], value).map_err(wr)?;
                }
            }
            Container::Dense(c) => {
                for &word in c.words() {
                    at += bytes::store_u64(&mut dst[at..], word).map_err(wr)?;
                }
            }
            Container::Runs(c) => {
                let count = wire_runs(c).count();
                at += bytes::store_u16(&mut dst[at..], count as u16).map_err(wr)?;
                for (start, len) in wire_runs(c) {
                    at += bytes::store_u16(&mut dst[at..], start).map_err(wr)?;
                    at += bytes::store_u16(&mut dst[at..], len as u16).map_err(wr)?;
                }
            }
        }
        Ok(at)
    }

    /// Serialize into a fresh vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0; self.serialized_size()];
        let written = self.serialize(&mut buf).expect("sized by serialized_size");
        debug_assert_eq!(written, buf.len());
        buf
    }

    /// Reconstruct a set and its exact container form from `src`.
    ///
    /// Returns the bitmap and the bytes consumed.
    pub fn deserialize(src: &[u8]) -> Result<(Self, usize), Error> {
        let (tag, mut at) = bytes::read_u8(src).map_err(rd)?;
        let container = match ContainerKind::try_from(tag)? {
            ContainerKind::Array => {
                let (count, n) = bytes::read_u16(&src[at..]).map_err(rd)?;
                at += n;
                let mut values = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    let (value, n) = bytes::read_u16(&src[at..]).map_err(rd)?;
                    at += n;
                    if values.last().map_or(false, |&p: &u16| p >= value) {
                        return Err(Error::Malformed);
                    }
                    values.push(value);
                }
                Container::Array(ArrayContainer::from_sorted(values))
            }
            ContainerKind::Bitmap => {
                let mut words = vec![0u64; dense::WORDS];
                for word in words.iter_mut() {
                    let (value, n) = bytes::read_u64(&src[at..]).map_err(rd)?;
                    at += n;
                    *word = value;
                }
                Container::Dense(DenseContainer::from_words(words.into_boxed_slice()))
            }
            ContainerKind::Runs => {
                let (count, n) = bytes::read_u16(&src[at..]).map_err(rd)?;
                at += n;
                let mut runs: Vec<Run> = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    let (start, n) = bytes::read_u16(&src[at..]).map_err(rd)?;
                    at += n;
                    let (len, n) = bytes::read_u16(&src[at..]).map_err(rd)?;
                    at += n;
                    if len == 0 {
                        return Err(Error::Malformed);
                    }
                    let last = u32::from(start) + u32::from(len) - 1;
                    if last > u32::from(u16::MAX) {
                        return Err(Error::Malformed);
                    }
                    match runs.last_mut() {
                        Some(previous) if u32::from(previous.last) + 1 == u32::from(start) => {
                            // Wire-split neighbor; stitch it back together.
                            previous.last = last as u16;
                        }
                        Some(previous) if previous.last >= start => {
                            return Err(Error::Malformed);
                        }
                        _ => runs.push(Run {
                            start,
                            last: last as u16,
                        }),
                    }
                }
                Container::Runs(RunContainer::from_runs(runs))
            }
        };
        Ok((Bitmap { container }, at))
    }
}

/// Total serialized length implied by the head of `src`, without decoding.
pub fn peek_len(src: &[u8]) -> Result<usize, Error> {
    let (tag, at) = bytes::read_u8(src).map_err(rd)?;
    match ContainerKind::try_from(tag)? {
        ContainerKind::Array => {
            let (count, n) = bytes::read_u16(&src[at..]).map_err(rd)?;
            Ok(at + n + usize::from(count) * 2)
        }
        ContainerKind::Bitmap => Ok(at + DENSE_BYTES),
        ContainerKind::Runs => {
            let (count, n) = bytes::read_u16(&src[at..]).map_err(rd)?;
            Ok(at + n + usize::from(count) * 4)
        }
    }
}
