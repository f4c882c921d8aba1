//! Frame header codec.
//!
//! The 3-byte header triplet packs four fields into its second byte:
//!
//! ```text
//! ┌───────────────┬──────────────────────────────┬───────────┐
//! │ 255 - address │ dir(1) len(2) pri(1) code(4) │ CRC-8     │
//! │               │ bit 0  bits1-2 bit 3 bits4-7 │           │
//! └───────────────┴──────────────────────────────┴───────────┘
//! ```
//!
//! Each field decodes against a closed enum; an out-of-range bit pattern is
//! a decode failure, never a default.

use crate::bit::{check_crc, create_crc, crop_u8};
use crate::error::{FrameError, Result};

/// Header triplet size in bytes.
pub const HEADER_SIZE: usize = 3;

/// Who is talking: the bus master or the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    FromMaster = 0,
    FromSlave = 1,
}

impl TryFrom<u8> for Direction {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Direction::FromMaster),
            1 => Ok(Direction::FromSlave),
            other => Err(FrameError::InvalidHeader {
                field: "direction",
                value: other,
            }),
        }
    }
}

/// Message priority flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    NoPriority = 0,
    Priority = 1,
}

impl TryFrom<u8> for Priority {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Priority::NoPriority),
            1 => Ok(Priority::Priority),
            other => Err(FrameError::InvalidHeader {
                field: "priority",
                value: other,
            }),
        }
    }
}

/// Total frame size in triplets, or an open-ended read-until-idle run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Byte3 = 0,
    Byte6 = 1,
    Byte9 = 2,
    Variable = 3,
}

impl Length {
    /// Total wire bytes for this class, or `None` for `Variable`.
    pub fn expected_bytes(self) -> Option<usize> {
        match self {
            Length::Byte3 => Some(3),
            Length::Byte6 => Some(6),
            Length::Byte9 => Some(9),
            Length::Variable => None,
        }
    }

    /// Parameter bytes a request of this class carries after the header.
    pub fn param_bytes(self) -> usize {
        match self {
            Length::Byte3 | Length::Variable => 0,
            Length::Byte6 => 2,
            Length::Byte9 => 4,
        }
    }
}

impl TryFrom<u8> for Length {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Length::Byte3),
            1 => Ok(Length::Byte6),
            2 => Ok(Length::Byte9),
            3 => Ok(Length::Variable),
            other => Err(FrameError::InvalidHeader {
                field: "length",
                value: other,
            }),
        }
    }
}

/// A decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Logical device id; transmitted as its one's complement.
    pub address: u8,
    /// Command/function selector (0–15).
    pub code: u8,
    pub priority: Priority,
    pub length: Length,
    pub direction: Direction,
}

impl Frame {
    /// Create a new frame header.
    pub fn new(
        address: u8,
        code: u8,
        priority: Priority,
        length: Length,
        direction: Direction,
    ) -> Self {
        Self {
            address,
            code,
            priority,
            length,
            direction,
        }
    }

    fn header_byte(&self) -> u8 {
        self.direction as u8
            | (self.length as u8) << 1
            | (self.priority as u8) << 3
            | (self.code & 0x0F) << 4
    }

    /// Encode the header triplet.
    pub fn encode_header(&self) -> [u8; HEADER_SIZE] {
        let byte0 = crop_u8(255 - u16::from(self.address));
        let byte1 = self.header_byte();
        [byte0, byte1, create_crc(byte0, byte1)]
    }

    /// Encode the full request: header triplet plus parameter triplets.
    ///
    /// `Byte6` requires exactly 2 parameter bytes, `Byte9` exactly 4;
    /// `Byte3` and `Variable` requests carry none.
    pub fn encode(&self, params: &[u8]) -> Result<Vec<u8>> {
        let expected = self.length.param_bytes();
        if params.len() != expected {
            return Err(FrameError::ParamCount {
                length: self.length,
                expected,
                actual: params.len(),
            });
        }

        let mut out = Vec::with_capacity(HEADER_SIZE + expected / 2 * 3);
        out.extend_from_slice(&self.encode_header());

        for pair in params.chunks_exact(2) {
            let byte_a = crop_u8(255 - u16::from(pair[0]));
            let byte_b = pair[1];
            out.push(byte_a);
            out.push(byte_b);
            out.push(create_crc(byte_a, byte_b));
        }

        Ok(out)
    }

    /// Decode a header triplet, verifying CRC and field validity.
    pub fn decode_header(bytes: &[u8; HEADER_SIZE]) -> Result<Frame> {
        if !check_crc(bytes[0], bytes[1], bytes[2]) {
            return Err(FrameError::ChecksumMismatch {
                byte1: bytes[0],
                byte2: bytes[1],
                expected: bytes[2],
                computed: create_crc(bytes[0], bytes[1]),
            });
        }

        let address = 255 - bytes[0];
        let header = bytes[1];

        let direction = Direction::try_from(header & 0x01)?;
        let length = Length::try_from((header & 0x06) >> 1)?;
        let priority = Priority::try_from((header & 0x08) >> 3)?;
        let code = (header & 0xF0) >> 4;

        Ok(Frame {
            address,
            code,
            priority,
            length,
            direction,
        })
    }
}
