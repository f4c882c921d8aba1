//! The request/answer cycle.
//!
//! One exchange is: encode the request, write it, pause for the line
//! turnaround, read the 3-byte answer header, then read the rest according
//! to the length class the header declares. Every received triplet goes
//! through the [`Stream`] assembler so CRC and length failures surface
//! before any payload is decoded.

use easybus_frame::{decode_u16, decode_u32, Direction, Frame, Length, Reading, Stream, HEADER_SIZE};
use easybus_transport::Connection;
use tracing::debug;

use crate::command::Command;
use crate::error::{DeviceError, Result};

/// A decoded instrument answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// A bare acknowledge with no payload.
    Ack,
    /// A single reading (which may be an instrument fault).
    Value(Reading),
    /// One reading per payload triplet of a variable-length answer.
    Series(Vec<Reading>),
}

/// Run one command against the instrument and decode its answer.
pub fn exchange<C: Connection>(connection: &mut C, command: &Command) -> Result<Answer> {
    let request = command.request()?;
    debug!(
        command = command.name,
        address = command.address,
        bytes = request.len(),
        "sending request"
    );

    connection.send(&request)?;
    connection.wait();

    let header_bytes = connection.receive_exact(HEADER_SIZE)?;
    let header = [header_bytes[0], header_bytes[1], header_bytes[2]];
    let frame = Frame::decode_header(&header)?;

    if frame.direction != Direction::FromSlave {
        return Err(DeviceError::NotFromInstrument);
    }

    let answer = match frame.length {
        Length::Byte3 => Answer::Ack,
        Length::Byte6 => {
            let stream = receive_fixed(connection, &header, 6)?;
            let (byte_a, byte_b) = stream.pair(1).ok_or(DeviceError::ShortAnswer)?;
            Answer::Value(decode_u16(byte_a, byte_b))
        }
        Length::Byte9 => {
            let stream = receive_fixed(connection, &header, 9)?;
            let (byte_a, byte_b) = stream.pair(1).ok_or(DeviceError::ShortAnswer)?;
            let (byte_c, byte_d) = stream.pair(2).ok_or(DeviceError::ShortAnswer)?;
            Answer::Value(decode_u32(byte_a, byte_b, byte_c, byte_d))
        }
        Length::Variable => {
            let rest = connection.receive_until_idle()?;

            let mut stream = Stream::new(Length::Variable);
            stream.append(&header)?;
            if !rest.is_empty() {
                stream.append(&rest)?;
            }

            let mut readings = Vec::with_capacity(stream.triplet_count() - 1);
            for index in 1..stream.triplet_count() {
                let (byte_a, byte_b) = stream.pair(index).ok_or(DeviceError::ShortAnswer)?;
                readings.push(decode_u16(byte_a, byte_b));
            }
            Answer::Series(readings)
        }
    };

    debug!(command = command.name, ?answer, "answer decoded");
    Ok(answer)
}

/// Read the remainder of a fixed-length answer and verify the whole frame.
fn receive_fixed<C: Connection>(
    connection: &mut C,
    header: &[u8; HEADER_SIZE],
    total: usize,
) -> Result<Stream> {
    let rest = connection.receive_exact(total - HEADER_SIZE)?;

    let mut wire = Vec::with_capacity(total);
    wire.extend_from_slice(header);
    wire.extend_from_slice(&rest);

    let length = match total {
        6 => Length::Byte6,
        _ => Length::Byte9,
    };
    let mut stream = Stream::new(length);
    stream.decode(&wire)?;
    Ok(stream)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use easybus_transport::{Connection, Result, TransportError};

    /// A scripted stand-in for the serial port: records everything sent,
    /// answers from a pre-loaded byte queue.
    pub(crate) struct ScriptedConnection {
        pub sent: Vec<Vec<u8>>,
        pub waits: usize,
        incoming: VecDeque<u8>,
    }

    impl ScriptedConnection {
        pub fn new() -> Self {
            Self {
                sent: Vec::new(),
                waits: 0,
                incoming: VecDeque::new(),
            }
        }

        pub fn reply(mut self, bytes: &[u8]) -> Self {
            self.incoming.extend(bytes);
            self
        }
    }

    impl Connection for ScriptedConnection {
        fn send(&mut self, bytes: &[u8]) -> Result<()> {
            self.sent.push(bytes.to_vec());
            Ok(())
        }

        fn receive_exact(&mut self, count: usize) -> Result<Vec<u8>> {
            if self.incoming.len() < count {
                return Err(TransportError::Timeout {
                    expected: count,
                    actual: self.incoming.len(),
                });
            }
            Ok(self.incoming.drain(..count).collect())
        }

        fn receive_until_idle(&mut self) -> Result<Vec<u8>> {
            Ok(self.incoming.drain(..).collect())
        }

        fn wait(&mut self) {
            self.waits += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedConnection;
    use super::*;
    use easybus_frame::{create_crc, FrameError, Priority};
    use easybus_transport::TransportError;

    fn triplet(byte_a: u8, byte_b: u8) -> [u8; 3] {
        [byte_a, byte_b, create_crc(byte_a, byte_b)]
    }

    fn answer_header(length: Length) -> [u8; 3] {
        Frame::new(1, 0, Priority::NoPriority, length, Direction::FromSlave).encode_header()
    }

    fn read_command() -> Command {
        Command::new("read measurement", 0, 1, 0)
    }

    #[test]
    fn byte3_answer_is_an_ack() {
        let mut connection = ScriptedConnection::new().reply(&answer_header(Length::Byte3));

        let answer = exchange(&mut connection, &read_command()).unwrap();

        assert_eq!(answer, Answer::Ack);
        assert_eq!(connection.sent, vec![vec![0xFE, 0x00, 0x3D]]);
        assert_eq!(connection.waits, 1);
    }

    #[test]
    fn byte6_answer_decodes_one_reading() {
        let mut connection = ScriptedConnection::new()
            .reply(&answer_header(Length::Byte6))
            .reply(&triplet(0xB7, 0xEB));

        let answer = exchange(&mut connection, &read_command()).unwrap();
        assert_eq!(answer, Answer::Value(Reading::Value(23.5)));
    }

    #[test]
    fn byte9_answer_decodes_wide_reading() {
        // Full measurement answer for -0.04 from address 1.
        let mut connection = ScriptedConnection::new()
            .reply(&[0xFE, 0x05, 0x26])
            .reply(&triplet(0x72, 0xFF))
            .reply(&triplet(0x00, 0xFC));

        let answer = exchange(&mut connection, &read_command()).unwrap();
        assert_eq!(answer, Answer::Value(Reading::Value(-0.04)));
    }

    #[test]
    fn variable_answer_decodes_a_series() {
        let mut connection = ScriptedConnection::new()
            .reply(&answer_header(Length::Variable))
            .reply(&triplet(0xB7, 0xEB))
            .reply(&triplet(0xB7, 0xEB));

        let answer = exchange(&mut connection, &read_command()).unwrap();
        assert_eq!(
            answer,
            Answer::Series(vec![Reading::Value(23.5), Reading::Value(23.5)])
        );
    }

    #[test]
    fn variable_answer_may_be_header_only() {
        let mut connection = ScriptedConnection::new().reply(&answer_header(Length::Variable));

        let answer = exchange(&mut connection, &read_command()).unwrap();
        assert_eq!(answer, Answer::Series(Vec::new()));
    }

    #[test]
    fn instrument_fault_is_an_answer_not_an_error() {
        let mut connection = ScriptedConnection::new()
            .reply(&answer_header(Length::Byte6))
            .reply(&triplet(0xC0, 0xED));

        let answer = exchange(&mut connection, &read_command()).unwrap();
        assert_eq!(answer, Answer::Value(Reading::Fault(13)));
    }

    #[test]
    fn master_direction_in_answer_is_rejected() {
        let header =
            Frame::new(1, 0, Priority::NoPriority, Length::Byte3, Direction::FromMaster)
                .encode_header();
        let mut connection = ScriptedConnection::new().reply(&header);

        let err = exchange(&mut connection, &read_command()).unwrap_err();
        assert!(matches!(err, DeviceError::NotFromInstrument));
    }

    #[test]
    fn truncated_answer_times_out() {
        let mut connection = ScriptedConnection::new()
            .reply(&[0xFE, 0x05, 0x26])
            .reply(&triplet(0x72, 0xFF));

        let err = exchange(&mut connection, &read_command()).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Transport(TransportError::Timeout {
                expected: 6,
                actual: 3
            })
        ));
    }

    #[test]
    fn corrupted_payload_fails_crc() {
        let mut bad = triplet(0xB7, 0xEB);
        bad[2] ^= 0x01;

        let mut connection = ScriptedConnection::new()
            .reply(&answer_header(Length::Byte6))
            .reply(&bad);

        let err = exchange(&mut connection, &read_command()).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Frame(FrameError::ChecksumMismatch { .. })
        ));
    }
}
