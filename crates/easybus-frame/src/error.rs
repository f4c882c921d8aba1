use crate::frame::Length;

/// Errors that can occur while encoding or decoding frames.
///
/// Instrument-reported faults (sentinel value ranges) are deliberately NOT
/// part of this enum — a sentinel is a successfully decoded answer and is
/// carried by [`crate::value::Reading::Fault`] instead.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A header field carries a bit pattern outside its enum's value set.
    #[error("invalid header field {field}: {value:#04x}")]
    InvalidHeader { field: &'static str, value: u8 },

    /// A triplet's checksum byte does not match the recomputed CRC.
    #[error(
        "CRC mismatch for pair {byte1:#04x} {byte2:#04x}: expected {expected:#04x}, computed {computed:#04x}"
    )]
    ChecksumMismatch {
        byte1: u8,
        byte2: u8,
        expected: u8,
        computed: u8,
    },

    /// The accumulated byte count does not match the declared length class.
    #[error("{length:?} frame expects {expected} bytes, got {actual}")]
    LengthMismatch {
        length: Length,
        expected: usize,
        actual: usize,
    },

    /// Input length is not a positive multiple of 3.
    #[error("data size is not a triplet multiple ({0} bytes)")]
    NotTriplet(usize),

    /// Empty or all-zero data where payload bytes are required.
    #[error("data is empty")]
    EmptyData,

    /// Wrong number of parameter bytes for the frame's length class.
    #[error("{length:?} frame requires {expected} parameter bytes, got {actual}")]
    ParamCount {
        length: Length,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, FrameError>;
