#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

//! Primitive encodings shared by the datakit crates: bounds-checked
//! little-endian byte access, the tagged varint, and the ZigZag fold.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod bytes;
pub mod varint;
pub mod zigzag;

mod error;

pub use error::Error;

/// Native word of the datakit value domain.
pub type Word = u64;
