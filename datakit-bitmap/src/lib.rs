#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

//! A set of 16-bit integers that adapts its representation to its contents.
//!
//! A [`Bitmap`] holds exactly one of three container forms: a sorted sparse
//! array, a dense 8192-byte bit array, or a list of contiguous runs. Every
//! mutation may switch the form; external observers only see cardinality and
//! ascending iteration, which are preserved across any transition.

extern crate alloc;

mod bitmap;
mod container;
mod error;
mod iter;

pub mod serialize;


pub use bitmap::{
    Bitmap,
    BitmapStats,
};
pub use container::ContainerKind;
pub use error::Error;
pub use iter::Iter;

/// Number of distinct values the set can hold.
pub const UNIVERSE: u32 = 1 << 16;

/// Largest cardinality the sorted-array form is allowed to reach.
pub(crate) const ARRAY_MAX: usize = 4096;

/// Byte footprint of the dense form's bit array.
pub(crate) const DENSE_BYTES: usize = 8192;
