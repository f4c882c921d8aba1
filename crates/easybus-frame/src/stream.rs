//! Stream/triplet assembler.
//!
//! Accumulates raw bytes into verified 3-byte triplets and enforces the
//! total length against the declared length class. The assembler never
//! reads from a transport — callers feed it byte slices and it validates.

use bytes::{BufMut, BytesMut};

use crate::bit::{check_crc, create_crc, crop_u8};
use crate::error::{FrameError, Result};
use crate::frame::Length;

const TRIPLET_SIZE: usize = 3;

/// Assembly progress of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No bytes accumulated yet.
    Empty,
    /// Some verified triplets accumulated, fewer than the declared class.
    Partial,
    /// Accumulated bytes match the declared length class.
    Complete,
    /// A length or CRC failure halted assembly.
    Invalid,
}

/// A growable sequence of wire triplets with validation state.
///
/// Committed data length is always a multiple of 3. Create a fresh stream
/// per encode or decode operation; a failed operation marks the stream
/// [`StreamState::Invalid`] and it should be discarded.
#[derive(Debug)]
pub struct Stream {
    data: BytesMut,
    length: Length,
    state: StreamState,
}

impl Stream {
    /// Create an empty stream expecting the given length class.
    pub fn new(length: Length) -> Self {
        Self {
            data: BytesMut::with_capacity(length.expected_bytes().unwrap_or(TRIPLET_SIZE * 3)),
            length,
            state: StreamState::Empty,
        }
    }

    /// The declared length class.
    pub fn length(&self) -> Length {
        self.length
    }

    /// Current assembly state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Accumulated raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Accumulated byte count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no bytes have been accumulated.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of complete triplets accumulated.
    pub fn triplet_count(&self) -> usize {
        self.data.len() / TRIPLET_SIZE
    }

    /// Payload byte pair of triplet `index`, if present.
    pub fn pair(&self, index: usize) -> Option<(u8, u8)> {
        let base = index * TRIPLET_SIZE;
        match (self.data.get(base), self.data.get(base + 1)) {
            (Some(&a), Some(&b)) => Some((a, b)),
            _ => None,
        }
    }

    /// Append verified triplets.
    ///
    /// Input must be a positive multiple of 3 bytes and every incoming
    /// triplet must pass its CRC check before anything is committed — a
    /// failed append leaves the buffer untouched.
    pub fn append(&mut self, input: &[u8]) -> Result<()> {
        if input.is_empty() {
            self.state = StreamState::Invalid;
            return Err(FrameError::EmptyData);
        }
        if input.len() % TRIPLET_SIZE != 0 {
            self.state = StreamState::Invalid;
            return Err(FrameError::NotTriplet(input.len()));
        }

        if let Some(expected) = self.length.expected_bytes() {
            let total = self.data.len() + input.len();
            if total > expected {
                self.state = StreamState::Invalid;
                return Err(FrameError::LengthMismatch {
                    length: self.length,
                    expected,
                    actual: total,
                });
            }
        }

        for triplet in input.chunks_exact(TRIPLET_SIZE) {
            if !check_crc(triplet[0], triplet[1], triplet[2]) {
                self.state = StreamState::Invalid;
                return Err(FrameError::ChecksumMismatch {
                    byte1: triplet[0],
                    byte2: triplet[1],
                    expected: triplet[2],
                    computed: create_crc(triplet[0], triplet[1]),
                });
            }
        }

        self.data.put_slice(input);
        self.state = match self.length.expected_bytes() {
            Some(expected) if self.data.len() == expected => StreamState::Complete,
            Some(_) => StreamState::Partial,
            // Variable frames end when the wire goes idle; any verified
            // multiple of 3 is usable.
            None => StreamState::Complete,
        };

        Ok(())
    }

    /// Overwrite the buffer with a complete received frame and verify it.
    pub fn decode(&mut self, input: &[u8]) -> Result<()> {
        self.data.clear();
        self.state = StreamState::Empty;

        if let Some(expected) = self.length.expected_bytes() {
            if input.len() != expected {
                self.state = StreamState::Invalid;
                return Err(FrameError::LengthMismatch {
                    length: self.length,
                    expected,
                    actual: input.len(),
                });
            }
        }

        self.append(input)
    }

    /// Apply the wire transform in place: for every triplet, one's-complement
    /// the first byte and recompute the checksum byte.
    ///
    /// The buffer is expected to hold raw (untransformed) payload bytes,
    /// e.g. written by [`Stream::set_data`]. An all-zero buffer is refused.
    pub fn encode(&mut self) -> Result<()> {
        if self.data.iter().all(|&byte| byte == 0) {
            return Err(FrameError::EmptyData);
        }

        let mut pos = 0;
        while pos < self.data.len() {
            let byte1 = crop_u8(255 - u16::from(self.data[pos]));
            let crc = create_crc(byte1, self.data[pos + 1]);

            self.data[pos] = byte1;
            self.data[pos + 2] = crc;

            pos += TRIPLET_SIZE;
        }

        self.state = match self.length.expected_bytes() {
            Some(expected) if self.data.len() == expected => StreamState::Complete,
            Some(_) => StreamState::Partial,
            None => StreamState::Complete,
        };

        Ok(())
    }

    /// Raw overwrite; the input must match the pre-declared width exactly
    /// (`Variable` accepts any multiple of 3).
    pub fn set_data(&mut self, input: &[u8]) -> Result<()> {
        match self.length.expected_bytes() {
            Some(expected) if input.len() != expected => {
                return Err(FrameError::LengthMismatch {
                    length: self.length,
                    expected,
                    actual: input.len(),
                });
            }
            None if input.len() % TRIPLET_SIZE != 0 => {
                return Err(FrameError::NotTriplet(input.len()));
            }
            _ => {}
        }

        self.data.clear();
        self.data.put_slice(input);
        self.state = StreamState::Partial;
        Ok(())
    }

    /// Check the accumulated byte count against the declared length class.
    pub fn verify_length(&self) -> bool {
        let length = self.data.len();

        if length == 0 || length % TRIPLET_SIZE != 0 {
            return false;
        }

        match self.length.expected_bytes() {
            Some(expected) => length == expected,
            None => true,
        }
    }

    /// Re-verify every triplet's checksum.
    pub fn verify_crc(&self) -> Result<()> {
        for triplet in self.data.chunks_exact(TRIPLET_SIZE) {
            if !check_crc(triplet[0], triplet[1], triplet[2]) {
                return Err(FrameError::ChecksumMismatch {
                    byte1: triplet[0],
                    byte2: triplet[1],
                    expected: triplet[2],
                    computed: create_crc(triplet[0], triplet[1]),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit::create_crc;

    fn triplet(byte_a: u8, byte_b: u8) -> [u8; 3] {
        [byte_a, byte_b, create_crc(byte_a, byte_b)]
    }

    #[test]
    fn new_stream_is_empty() {
        let stream = Stream::new(Length::Byte3);
        assert_eq!(stream.state(), StreamState::Empty);
        assert_eq!(stream.len(), 0);
        assert!(stream.is_empty());
    }

    #[test]
    fn append_single_triplet_completes_byte3() {
        let mut stream = Stream::new(Length::Byte3);
        stream.append(&triplet(0xFE, 0x00)).unwrap();

        assert_eq!(stream.state(), StreamState::Complete);
        assert_eq!(stream.triplet_count(), 1);
        assert!(stream.verify_length());
    }

    #[test]
    fn append_accumulates_to_byte9() {
        let mut stream = Stream::new(Length::Byte9);

        stream.append(&triplet(0xFE, 0x05)).unwrap();
        assert_eq!(stream.state(), StreamState::Partial);
        assert!(!stream.verify_length());

        stream.append(&triplet(0x72, 0xFF)).unwrap();
        assert_eq!(stream.state(), StreamState::Partial);

        stream.append(&triplet(0x00, 0xFC)).unwrap();
        assert_eq!(stream.state(), StreamState::Complete);
        assert!(stream.verify_length());
        assert_eq!(stream.len() % 3, 0);
    }

    #[test]
    fn append_rejects_empty_input() {
        let mut stream = Stream::new(Length::Byte3);
        assert!(matches!(
            stream.append(&[]).unwrap_err(),
            FrameError::EmptyData
        ));
        assert_eq!(stream.state(), StreamState::Invalid);
    }

    #[test]
    fn append_rejects_non_triplet_input() {
        let mut stream = Stream::new(Length::Byte3);
        assert!(matches!(
            stream.append(&[0xFE, 0x00]).unwrap_err(),
            FrameError::NotTriplet(2)
        ));
        assert_eq!(stream.state(), StreamState::Invalid);
    }

    #[test]
    fn append_bad_crc_commits_nothing() {
        let mut stream = Stream::new(Length::Byte6);
        stream.append(&triplet(0xFE, 0x03)).unwrap();

        let mut bad = triplet(0xB7, 0xEB);
        bad[2] ^= 0x01;
        let err = stream.append(&bad).unwrap_err();

        assert!(matches!(err, FrameError::ChecksumMismatch { .. }));
        assert_eq!(stream.state(), StreamState::Invalid);
        // First triplet stays, the failed append committed nothing.
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn append_beyond_declared_length_fails() {
        let mut stream = Stream::new(Length::Byte3);
        stream.append(&triplet(0xFE, 0x00)).unwrap();

        let err = stream.append(&triplet(0xFE, 0x00)).unwrap_err();
        assert!(matches!(err, FrameError::LengthMismatch { .. }));
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn variable_stream_completes_on_any_valid_append() {
        let mut stream = Stream::new(Length::Variable);

        let mut wire = Vec::new();
        for _ in 0..4 {
            wire.extend_from_slice(&triplet(0xB7, 0xEB));
        }
        stream.append(&wire).unwrap();

        assert_eq!(stream.state(), StreamState::Complete);
        assert_eq!(stream.triplet_count(), 4);
        assert!(stream.verify_length());
    }

    #[test]
    fn decode_overwrites_and_verifies() {
        let mut stream = Stream::new(Length::Byte6);

        let mut wire = Vec::new();
        wire.extend_from_slice(&triplet(0xFE, 0x03));
        wire.extend_from_slice(&triplet(0xB7, 0xEB));

        stream.decode(&wire).unwrap();
        assert_eq!(stream.state(), StreamState::Complete);
        assert_eq!(stream.pair(1), Some((0xB7, 0xEB)));
    }

    #[test]
    fn decode_wrong_total_length_fails() {
        let mut stream = Stream::new(Length::Byte6);
        let err = stream.decode(&triplet(0xFE, 0x00)).unwrap_err();

        assert!(matches!(err, FrameError::LengthMismatch { .. }));
        assert_eq!(stream.state(), StreamState::Invalid);
    }

    #[test]
    fn encode_transforms_in_place() {
        let mut stream = Stream::new(Length::Byte3);
        stream.set_data(&[0x01, 0x00, 0x00]).unwrap();
        stream.encode().unwrap();

        assert_eq!(stream.data(), &[0xFE, 0x00, 0x3D]);
        assert_eq!(stream.state(), StreamState::Complete);
        assert!(stream.verify_crc().is_ok());
    }

    #[test]
    fn encode_refuses_all_zero_buffer() {
        let mut stream = Stream::new(Length::Byte3);
        stream.set_data(&[0x00, 0x00, 0x00]).unwrap();

        assert!(matches!(stream.encode().unwrap_err(), FrameError::EmptyData));
    }

    #[test]
    fn set_data_requires_exact_width() {
        let mut stream = Stream::new(Length::Byte6);

        assert!(matches!(
            stream.set_data(&[0u8; 9]).unwrap_err(),
            FrameError::LengthMismatch { .. }
        ));
        assert!(stream.set_data(&[0u8; 6]).is_ok());
        assert_eq!(stream.len(), 6);
    }

    #[test]
    fn set_data_variable_accepts_triplet_multiples() {
        let mut stream = Stream::new(Length::Variable);

        assert!(stream.set_data(&[0u8; 12]).is_ok());
        assert_eq!(stream.len(), 12);
        assert!(matches!(
            stream.set_data(&[0u8; 7]).unwrap_err(),
            FrameError::NotTriplet(7)
        ));
    }

    #[test]
    fn tampered_triplet_fails_crc_verification() {
        let base = triplet(0x72, 0xFF);

        for byte in 0..2 {
            for bit in 0..8 {
                let mut tampered = base;
                tampered[byte] ^= 1 << bit;

                let mut stream = Stream::new(Length::Byte3);
                assert!(
                    stream.append(&tampered).is_err(),
                    "flip of byte {byte} bit {bit} must be caught"
                );
            }
        }
    }

    #[test]
    fn pair_out_of_range_is_none() {
        let mut stream = Stream::new(Length::Byte3);
        stream.append(&triplet(0xFE, 0x00)).unwrap();

        assert_eq!(stream.pair(0), Some((0xFE, 0x00)));
        assert_eq!(stream.pair(1), None);
    }
}
