#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

//! A four-level cascading timing wheel.
//!
//! Level 0 is a ring of 256 one-millisecond slots; each of the three upper
//! 64-slot rings spans a full turn of the ring below, for roughly 18.6 hours
//! of total coverage. Timers beyond coverage wait in an ordered overflow
//! store; timers created inside callbacks or with sub-slot delays wait in a
//! pending store drained at the end of each advance. Cancellation marks an
//! identifier and retires the timer wherever it happens to live when next
//! scanned, so unregistering never searches the rings.
//!
//! The wheel is single-threaded and cooperative: nothing blocks, spawns, or
//! fires outside [`Wheel::advance`] / [`Wheel::poll`].

extern crate alloc;

mod cancel;
mod error;
mod timer;
mod wheel;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use timer::{
    Callback,
    TimerId,
};
pub use wheel::{
    Wheel,
    WheelStats,
};
