/// Error when mutating or deserializing a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum Error {
    /// A range had `start > end` or reached past the 16-bit domain.
    #[cfg_attr(
        feature = "std",
        error("invalid range {start}..{end} over the 16-bit domain")
    )]
    InvalidRange {
        /// Inclusive lower bound of the offending range.
        start: u32,
        /// Exclusive upper bound of the offending range.
        end: u32,
    },
    /// The serialized form names a container kind that does not exist.
    #[cfg_attr(feature = "std", error("unknown container kind {0:#04x}"))]
    UnknownContainer(u8),
    /// The serialized payload ended before its declared content.
    #[cfg_attr(feature = "std", error("serialized bitmap ends unexpectedly"))]
    UnexpectedEnd,
    /// The destination buffer cannot hold the serialized form.
    #[cfg_attr(feature = "std", error("destination buffer too short"))]
    BufferTooShort,
    /// The serialized payload violates the container's ordering rules.
    #[cfg_attr(feature = "std", error("malformed serialized bitmap"))]
    Malformed,
    /// An iterator handed to a sorted constructor was not strictly ascending.
    #[cfg_attr(feature = "std", error("input values are not strictly ascending"))]
    NotAscending,
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidRange { start, end } => {
                write!(f, "invalid range {start}..{end} over the 16-bit domain")
            }
            Error::UnknownContainer(kind) => write!(f, "unknown container kind {kind:#04x}"),
            Error::UnexpectedEnd => f.write_str("serialized bitmap ends unexpectedly"),
            Error::BufferTooShort => f.write_str("destination buffer too short"),
            Error::Malformed => f.write_str("malformed serialized bitmap"),
            Error::NotAscending => f.write_str("input values are not strictly ascending"),
        }
    }
}
