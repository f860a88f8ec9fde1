use alloc::{
    vec,
    vec::Vec,
};

use datakit_bitmap::ContainerKind;

use crate::{
    bitmap,
    delta,
    dict,
    frame,
    patched,
    stats,
    tagged,
    Error,
};

/// The encoding schemes, identified by the buffer's leading tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Encoding {
    /// Base value plus ZigZag deltas; sorted or sequential data.
    #[display(fmt = "delta")]
    Delta = 0x00,
    /// Frame-of-reference: offsets from a frame minimum at a fixed width.
    #[display(fmt = "for")]
    For = 0x01,
    /// Patched frame-of-reference: FOR with an exception sidecar.
    #[display(fmt = "pfor")]
    Pfor = 0x02,
    /// Sorted dictionary of distinct values plus packed indices.
    #[display(fmt = "dict")]
    Dict = 0x03,
    /// Bitmap-set payload over the 16-bit domain.
    #[display(fmt = "bitmap")]
    Bitmap = 0x04,
    /// One tagged varint per value; the general-purpose fallback.
    #[display(fmt = "tagged")]
    Tagged = 0x05,
}

/// Every scheme, in tag order.
pub(crate) const ENCODINGS: [Encoding; 6] = [
    Encoding::Delta,
    Encoding::For,
    Encoding::Pfor,
    Encoding::Dict,
    Encoding::Bitmap,
    Encoding::Tagged,
];

impl Encoding {
    /// The tag byte leading this scheme's encoded buffers.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Stable human-readable label.
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Delta => "delta",
            Encoding::For => "for",
            Encoding::Pfor => "pfor",
            Encoding::Dict => "dict",
            Encoding::Bitmap => "bitmap",
            Encoding::Tagged => "tagged",
        }
    }

    /// Upper bound on this scheme's encoded size for `count` values,
    /// including the tag byte.
    pub const fn max_encoded_size(self, count: usize) -> usize {
        1 + match self {
            Encoding::Delta | Encoding::Tagged => 9 * count,
            Encoding::For => 10 + 8 * count,
            Encoding::Pfor => 19 + 17 * count,
            Encoding::Dict => 10 + 17 * count,
            Encoding::Bitmap => {
                let runs_worst = 3 + 4 * count;
                if runs_worst > 8193 {
                    runs_worst
                } else {
                    8193
                }
            }
        }
    }
}

impl TryFrom<u8> for Encoding {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0x00 => Ok(Encoding::Delta),
            0x01 => Ok(Encoding::For),
            0x02 => Ok(Encoding::Pfor),
            0x03 => Ok(Encoding::Dict),
            0x04 => Ok(Encoding::Bitmap),
            0x05 => Ok(Encoding::Tagged),
            other => Err(Error::UnknownTag(other)),
        }
    }
}

/// Per-scheme parameters recorded while encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Metadata {
    /// Delta parameters.
    Delta {
        /// First value of the array, stored verbatim.
        base: u64,
    },
    /// Frame-of-reference parameters.
    For {
        /// Frame minimum subtracted from every value.
        min: u64,
        /// Bits per packed offset.
        width: u8,
    },
    /// Patched frame-of-reference parameters.
    Pfor {
        /// Frame minimum subtracted from every value.
        min: u64,
        /// Bits per packed offset.
        width: u8,
        /// Values diverted to the exception sidecar.
        exceptions: u64,
        /// Offsets at or above this in-band marker become exceptions.
        threshold: u64,
    },
    /// Dictionary parameters.
    Dict {
        /// Distinct values in the table.
        distinct: u64,
        /// Bits per packed table index.
        width: u8,
    },
    /// Bitmap parameters.
    Bitmap {
        /// Container form the set settled on.
        kind: ContainerKind,
    },
    /// Tagged varints carry no parameters.
    Tagged,
}

impl Metadata {
    /// The scheme this metadata belongs to.
    pub const fn encoding(&self) -> Encoding {
        match self {
            Metadata::Delta { .. } => Encoding::Delta,
            Metadata::For { .. } => Encoding::For,
            Metadata::Pfor { .. } => Encoding::Pfor,
            Metadata::Dict { .. } => Encoding::Dict,
            Metadata::Bitmap { .. } => Encoding::Bitmap,
            Metadata::Tagged => Encoding::Tagged,
        }
    }
}

/// Encode adaptively: analyze the input, pick a scheme, write tag and
/// payload into `dst`. Returns the bytes written and the scheme parameters.
pub fn encode(values: &[u64], dst: &mut [u8]) -> Result<(usize, Metadata), Error> {
    let chosen = stats::select(&stats::analyze(values));
    encode_with(chosen, values, dst)
}

/// Encode under a caller-forced scheme.
pub fn encode_with(
    encoding: Encoding,
    values: &[u64],
    dst: &mut [u8],
) -> Result<(usize, Metadata), Error> {
    let (tag, payload) = dst.split_first_mut().ok_or(Error::BufferTooShort)?;
    *tag = encoding.tag();
    let (written, metadata) = match encoding {
        Encoding::Delta => delta::encode(values, payload)?,
        Encoding::For => frame::encode(values, payload)?,
        Encoding::Pfor => patched::encode(values, payload)?,
        Encoding::Dict => dict::encode(values, payload)?,
        Encoding::Bitmap => bitmap::encode(values, payload)?,
        Encoding::Tagged => tagged::encode(values, payload)?,
    };
    Ok((written + 1, metadata))
}

/// Encode adaptively into a fresh vector.
pub fn encode_to_vec(values: &[u64]) -> Result<(Vec<u8>, Metadata), Error> {
    let chosen = stats::select(&stats::analyze(values));
    let mut buf = vec![0; chosen.max_encoded_size(values.len())];
    let (written, metadata) = encode_with(chosen, values, &mut buf)?;
    buf.truncate(written);
    Ok((buf, metadata))
}

/// Decode `count` values from `src`, dispatching on the tag byte, and
/// append them to `out`. Returns the bytes consumed.
///
/// On any error nothing is appended.
pub fn decode(src: &[u8], count: usize, out: &mut Vec<u64>) -> Result<usize, Error> {
    let start = out.len();
    decode_inner(src, count, out).map_err(|err| {
        out.truncate(start);
        err
    })
}

fn decode_inner(src: &[u8], count: usize, out: &mut Vec<u64>) -> Result<usize, Error> {
    let (&tag, payload) = src.split_first().ok_or(Error::UnexpectedEnd)?;
    out.reserve(count);
    let consumed = match Encoding::try_from(tag)? {
        Encoding::Delta => delta::decode(payload, count, out)?,
        Encoding::For => frame::decode(payload, count, out)?,
        Encoding::Pfor => patched::decode(payload, count, out)?,
        Encoding::Dict => dict::decode(payload, count, out)?,
        Encoding::Bitmap => bitmap::decode(payload, count, out)?,
        Encoding::Tagged => tagged::decode(payload, count, out)?,
    };
    Ok(consumed + 1)
}

/// Decode `count` values into a fresh vector. Returns the values and the
/// bytes consumed.
pub fn decode_to_vec(src: &[u8], count: usize) -> Result<(Vec<u64>, usize), Error> {
    let mut out = Vec::with_capacity(count);
    let consumed = decode(src, count, &mut out)?;
    Ok((out, consumed))
}

/// Total encoded size of the block at the head of `src`, without
/// materializing any values. Lets a reader skip over a block.
pub fn encoded_size(src: &[u8], count: usize) -> Result<usize, Error> {
    let (&tag, payload) = src.split_first().ok_or(Error::UnexpectedEnd)?;
    let payload_size = match Encoding::try_from(tag)? {
        Encoding::Delta | Encoding::Tagged => tagged::size(payload, count)?,
        Encoding::For => frame::size(payload, count)?,
        Encoding::Pfor => patched::size(payload, count)?,
        Encoding::Dict => dict::size(payload, count)?,
        Encoding::Bitmap => bitmap::size(payload)?,
    };
    Ok(payload_size + 1)
}

/// Destination size sufficient for any scheme over `count` values.
pub fn max_encoded_size(count: usize) -> usize {
    ENCODINGS
        .iter()
        .map(|encoding| encoding.max_encoded_size(count))
        .max()
        .unwrap_or(1)
}
