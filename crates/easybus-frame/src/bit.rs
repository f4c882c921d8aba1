//! CRC engine and width-checked bit-packing helpers.
//!
//! The checksum is a fixed 16-round LFSR-style shift-XOR over a `u16`
//! accumulator. The accumulator width matters: overflow bits beyond bit 15
//! must be discarded on every shift, so all arithmetic here stays on
//! explicit fixed-width unsigned types.

use tracing::error;

/// Mask a value down to its low 8 bits.
pub fn crop_u8(value: u16) -> u8 {
    (value & 0x00FF) as u8
}

/// Mask a value down to its low 16 bits.
pub fn crop_u16(value: u32) -> u16 {
    (value & 0xFFFF) as u16
}

/// Mask a value down to its low 32 bits.
pub fn crop_u32(value: u64) -> u32 {
    (value & 0xFFFF_FFFF) as u32
}

/// Assemble a `u16` from a wire byte pair.
///
/// The first byte of every pair travels as its one's complement, so it is
/// inverted back before forming the high byte.
pub fn convert_u16(byte_a: u8, byte_b: u8) -> u16 {
    ((255 - u16::from(byte_a)) << 8) | u16::from(byte_b)
}

/// Assemble a `u32` from two `u16` halves.
///
/// No inversion here — [`convert_u16`] already undid it at the byte level.
pub fn convert_u32(hi: u16, lo: u16) -> u32 {
    (u32::from(hi) << 16) | u32::from(lo)
}

/// Reinterpret a `u32` bit pattern as a two's-complement `i32`.
pub fn to_signed32(value: u32) -> i32 {
    value as i32
}

/// Reinterpret an `i32` as its two's-complement `u32` bit pattern.
pub fn to_unsigned32(value: i32) -> u32 {
    value as u32
}

/// Compute the 8-bit checksum over a byte pair.
///
/// 16 rounds over a 16-bit accumulator: shift left, XOR with 0x0700 when
/// the top bit was set. The final CRC is `255 - (accumulator >> 8)`.
pub fn create_crc(byte1: u8, byte2: u8) -> u8 {
    let mut acc: u16 = (u16::from(byte1) << 8) | u16::from(byte2);

    for _ in 0..16 {
        if acc & 0x8000 == 0x8000 {
            acc = (acc << 1) ^ 0x0700;
        } else {
            acc <<= 1;
        }
    }

    255 - (acc >> 8) as u8
}

/// Recompute the checksum for a byte pair and compare against the wire CRC.
///
/// Never fails hard: a mismatch is logged with both values in hex and
/// reported as `false`.
pub fn check_crc(byte1: u8, byte2: u8, crc: u8) -> bool {
    let computed = create_crc(byte1, byte2);
    if computed == crc {
        return true;
    }

    error!(
        "CRC check failed: {byte1:#04x} {byte2:#04x}, crc {crc:#04x}, calculated {computed:#04x}"
    );
    false
}
