/// Error when reading or writing primitive encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum Error {
    /// The buffer is too short for the requested read or write.
    #[cfg_attr(feature = "std", error("buffer too short"))]
    BufferTooShort,
    /// The bytes do not form a valid encoding of the expected type.
    #[cfg_attr(feature = "std", error("malformed encoding"))]
    Malformed,
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::BufferTooShort => f.write_str("buffer too short"),
            Error::Malformed => f.write_str("malformed encoding"),
        }
    }
}
