//! EasyBus wire codec: 3-byte triplet framing with CRC-8 checksums,
//! bit-packed headers, and a proprietary fixed-point value format.
//!
//! Every transmitted unit is a triplet `[byte_a, byte_b, crc]` where the
//! first byte travels as its one's complement (`255 - value`) and the third
//! byte is an 8-bit checksum over the first two. A frame is one, two, or
//! three triplets (or an open-ended run for variable-length answers).
//!
//! This crate is the pure transform layer — it performs no I/O and holds no
//! state across calls. The serial port, command tables, and error-text
//! lookups live in the sibling crates.

pub mod bit;
pub mod error;
pub mod frame;
pub mod stream;
pub mod value;

pub use bit::{
    check_crc, convert_u16, convert_u32, create_crc, crop_u16, crop_u32, crop_u8, to_signed32,
    to_unsigned32,
};
pub use error::{FrameError, Result};
pub use frame::{Direction, Frame, Length, Priority, HEADER_SIZE};
pub use stream::{Stream, StreamState};
pub use value::{decode_u16, decode_u32, encode_u32, Reading};
