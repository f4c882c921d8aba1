//! Fixed-point "floating" value codec with embedded fault sentinels.
//!
//! Measurements travel as 16-bit or 32-bit integers with a decimal exponent
//! packed into the high bits. A reserved sub-range of the integer space
//! carries an instrument fault code instead of a value ("No sensor",
//! "Battery empty", ...). A sentinel is a correctly decoded answer, not a
//! codec failure, so both outcomes share the [`Reading`] type.

use crate::bit::{convert_u16, convert_u32, create_crc, crop_u16, crop_u32, crop_u8, to_signed32};

/// Bottom of the reserved 16-bit mantissa sub-range (16352 = 0x3FE0).
pub const SENTINEL16_START: u16 = 0x3FE0;

/// Top of the reserved 16-bit mantissa sub-range.
pub const SENTINEL16_END: u16 = 0x3FFF;

/// 32-bit masks at or above this value carry a fault code
/// (100_000_000 + 0x0200_0000; firmware-fixed, keep the arithmetic form).
pub const SENTINEL32_THRESHOLD: u32 = 100_000_000 + 0x0200_0000;

/// Bias subtracted on encode and re-added on decode.
const VALUE32_BIAS: u32 = 0x0200_0000;

/// The 32-bit payload occupies the low 27 bits.
const VALUE32_MASK: u32 = 0x07FF_FFFF;

/// Sign bit of the 27-bit two's-complement payload (bit 26).
const VALUE32_SIGN_BIT: u32 = 0x0400_0000;

/// High bits OR-ed in when promoting a negative 27-bit value to 32 bits.
const VALUE32_SIGN_EXTEND: u32 = 0xF800_0000;

/// Zero offset of the 16-bit mantissa.
const VALUE16_OFFSET: f64 = 2048.0;

/// A decoded measurement payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// A finite measurement value.
    Value(f64),
    /// An instrument-reported fault code; text comes from the error table.
    Fault(u32),
}

impl Reading {
    /// The numeric value, if this reading is not a fault.
    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            Reading::Fault(_) => None,
        }
    }

    /// The fault code, if the instrument reported one.
    pub fn fault(&self) -> Option<u32> {
        match self {
            Reading::Value(_) => None,
            Reading::Fault(code) => Some(*code),
        }
    }

    /// True when the instrument reported a fault instead of a value.
    pub fn is_fault(&self) -> bool {
        matches!(self, Reading::Fault(_))
    }
}

/// Decode a 16-bit payload pair.
///
/// The top 2 bits select the decimal exponent, the low 14 bits hold the
/// mantissa. Mantissas inside the closed sentinel range are fault codes.
pub fn decode_u16(byte_a: u8, byte_b: u8) -> Reading {
    let raw = convert_u16(byte_a, byte_b);
    let exponent = (raw & 0xC000) >> 14;
    let mantissa = raw & 0x3FFF;

    if (SENTINEL16_START..=SENTINEL16_END).contains(&mantissa) {
        return Reading::Fault(u32::from(mantissa - SENTINEL16_START));
    }

    let value = (f64::from(mantissa) - VALUE16_OFFSET) / 10f64.powi(i32::from(exponent));
    Reading::Value(value)
}

/// Decode a 32-bit payload spread over two triplets.
///
/// The exponent lives in the top 5 bits of the (un-complemented) first
/// byte. The low 27 bits are a biased two's-complement mantissa; values at
/// or above [`SENTINEL32_THRESHOLD`] are fault codes. The threshold, the
/// bit-26 sign check, and the wrapping bias addition are firmware-exact —
/// do not simplify the arithmetic.
pub fn decode_u32(byte_a: u8, byte_b: u8, byte_c: u8, byte_d: u8) -> Reading {
    let raw = convert_u32(convert_u16(byte_a, byte_b), convert_u16(byte_c, byte_d));
    let exponent = i32::from((0xFF - byte_a) >> 3) - 15;
    let masked = raw & VALUE32_MASK;

    if masked < SENTINEL32_THRESHOLD {
        let mut word = masked;
        if word & VALUE32_SIGN_BIT == VALUE32_SIGN_BIT {
            word |= VALUE32_SIGN_EXTEND;
        }
        let adjusted = word.wrapping_add(VALUE32_BIAS);

        let value = f64::from(to_signed32(adjusted)) / 10f64.powi(exponent);
        Reading::Value(value)
    } else {
        Reading::Fault(masked - VALUE32_BIAS - 100_000_000)
    }
}

/// Encode a value into two wire triplets (6 bytes).
///
/// The inverse of [`decode_u32`] for values inside the instrument's real
/// range. The exponent here is the decimal digit count of the value's
/// integer part (a leading minus sign counts as a digit) — this is not the
/// algebraic inverse of the decode exponent formula for all inputs, and is
/// kept as the instrument defines it.
pub fn encode_u32(value: f64) -> [u8; 6] {
    let exponent = integer_digits(value);

    let scaled = (value * 10f64.powi(exponent)).round() as i64;
    let mut word = crop_u32(scaled as u64);
    word = word.wrapping_sub(VALUE32_BIAS);

    // Negative mantissas keep only their 27 payload bits on the wire.
    if word & VALUE32_SIGN_BIT == VALUE32_SIGN_BIT {
        word &= VALUE32_MASK;
    }

    word |= ((exponent + 15) as u32) << 27;

    let hi = crop_u16(word >> 16);
    let lo = crop_u16(word);
    let (byte_a, byte_b) = wire_pair(hi);
    let (byte_c, byte_d) = wire_pair(lo);

    [
        byte_a,
        byte_b,
        create_crc(byte_a, byte_b),
        byte_c,
        byte_d,
        create_crc(byte_c, byte_d),
    ]
}

/// Split a `u16` into its wire byte pair, one's-complementing the first.
fn wire_pair(half: u16) -> (u8, u8) {
    let byte_a = crop_u8(255 - (half >> 8));
    let byte_b = crop_u8(half);
    (byte_a, byte_b)
}

/// Decimal digit count of `floor(value)`, minus sign included.
fn integer_digits(value: f64) -> i32 {
    let floored = value.floor() as i64;

    let mut digits = 1;
    let mut rest = (floored / 10).abs();
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }

    if floored < 0 {
        digits += 1;
    }
    digits
}
