#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

//! Compact, self-describing codecs for arrays of 64-bit unsigned integers.
//!
//! Six concrete schemes cover the usual shapes of numeric data — sorted
//! sequences (delta), clustered ranges (frame-of-reference), clusters with
//! stragglers (patched frame-of-reference), heavy repetition (dictionary),
//! small dense sets (bitmap), and everything else (tagged varints). An
//! adaptive meta-codec inspects the input once and picks among them; the
//! chosen scheme's tag leads the encoded buffer, so decoding needs only the
//! buffer and the value count.

extern crate alloc;

mod bitmap;
mod delta;
mod dict;
mod encoding;
mod error;
mod frame;
mod pack;
mod patched;
mod stats;
mod tagged;


pub use encoding::{
    decode,
    decode_to_vec,
    encode,
    encode_to_vec,
    encode_with,
    encoded_size,
    max_encoded_size,
    Encoding,
    Metadata,
};
pub use error::Error;
pub use stats::{
    analyze,
    select,
    Stats,
};
