use crate::TimerId;

/// Error when scheduling against the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum Error {
    /// `advance`/`poll` was called from inside a timer callback.
    #[cfg_attr(feature = "std", error("advance called from a timer callback"))]
    ReentrantAdvance,
    /// The identifier was never issued by this wheel (or is the reserved 0).
    #[cfg_attr(feature = "std", error("timer {0} was never issued"))]
    UnknownTimer(TimerId),
    /// The 64-bit identifier namespace is exhausted.
    #[cfg_attr(feature = "std", error("timer identifier namespace exhausted"))]
    IdsExhausted,
    /// `now + delay` does not fit the 64-bit microsecond clock.
    #[cfg_attr(feature = "std", error("expiration overflows the microsecond clock"))]
    ExpirationOverflow,
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::ReentrantAdvance => f.write_str("advance called from a timer callback"),
            Error::UnknownTimer(id) => write!(f, "timer {id} was never issued"),
            Error::IdsExhausted => f.write_str("timer identifier namespace exhausted"),
            Error::ExpirationOverflow => {
                f.write_str("expiration overflows the microsecond clock")
            }
        }
    }
}
