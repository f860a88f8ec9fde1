/// Error when encoding or decoding a value array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum Error {
    /// The leading byte names no known encoding.
    #[cfg_attr(feature = "std", error("unknown encoding tag {0:#04x}"))]
    UnknownTag(u8),
    /// The buffer ended before the declared content.
    #[cfg_attr(feature = "std", error("encoded buffer ends unexpectedly"))]
    UnexpectedEnd,
    /// The payload violates the encoding's own rules.
    #[cfg_attr(feature = "std", error("malformed payload"))]
    Malformed,
    /// The destination buffer cannot hold the encoded form.
    #[cfg_attr(feature = "std", error("destination buffer too short"))]
    BufferTooShort,
    /// A stored bit width lies outside 0..=64 or is zero where zero is
    /// meaningless.
    #[cfg_attr(feature = "std", error("invalid bit width {0}"))]
    InvalidWidth(u8),
    /// The bitmap scheme only covers the 16-bit domain.
    #[cfg_attr(feature = "std", error("value {0} outside the bitmap domain"))]
    ValueOutOfDomain(u64),
    /// The bitmap scheme needs strictly ascending input.
    #[cfg_attr(feature = "std", error("values are not strictly ascending"))]
    NotAscending,
    /// The payload holds a different number of values than requested.
    #[cfg_attr(
        feature = "std",
        error("payload holds {actual} values, expected {expected}")
    )]
    CountMismatch {
        /// Values the caller asked to decode.
        expected: u64,
        /// Values the payload actually holds.
        actual: u64,
    },
    /// Error bubbled up from the bitmap container.
    #[cfg_attr(feature = "std", error(transparent))]
    Bitmap(datakit_bitmap::Error),
}

impl From<datakit_bitmap::Error> for Error {
    fn from(err: datakit_bitmap::Error) -> Self {
        match err {
            datakit_bitmap::Error::BufferTooShort => Error::BufferTooShort,
            datakit_bitmap::Error::UnexpectedEnd => Error::UnexpectedEnd,
            datakit_bitmap::Error::Malformed => Error::Malformed,
            other => Error::Bitmap(other),
        }
    }
}

/// Map a primitive error seen while writing output.
pub(crate) fn wr(err: datakit_types::Error) -> Error {
    match err {
        datakit_types::Error::BufferTooShort => Error::BufferTooShort,
        datakit_types::Error::Malformed => Error::Malformed,
    }
}

/// Map a primitive error seen while reading input.
pub(crate) fn rd(err: datakit_types::Error) -> Error {
    match err {
        datakit_types::Error::BufferTooShort => Error::UnexpectedEnd,
        datakit_types::Error::Malformed => Error::Malformed,
    }
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::UnknownTag(tag) => write!(f, "unknown encoding tag {tag:#04x}"),
            Error::UnexpectedEnd => f.write_str("encoded buffer ends unexpectedly"),
            Error::Malformed => f.write_str("malformed payload"),
            Error::BufferTooShort => f.write_str("destination buffer too short"),
            Error::InvalidWidth(width) => write!(f, "invalid bit width {width}"),
            Error::ValueOutOfDomain(value) => {
                write!(f, "value {value} outside the bitmap domain")
            }
            Error::NotAscending => f.write_str("values are not strictly ascending"),
            Error::CountMismatch { expected, actual } => {
                write!(f, "payload holds {actual} values, expected {expected}")
            }
            Error::Bitmap(inner) => write!(f, "{inner}"),
        }
    }
}
