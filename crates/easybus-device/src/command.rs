use easybus_frame::{Direction, Frame, Length, Priority};

use crate::error::Result;

/// One request an instrument understands.
///
/// The `number` is the driver-local selector users pick a command by; the
/// `code` is the 4-bit function code that goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: &'static str,
    pub number: u8,
    pub address: u8,
    pub code: u8,
    pub length: Length,
    pub param: Vec<u8>,
}

impl Command {
    /// A parameterless single-triplet request.
    pub fn new(name: &'static str, number: u8, address: u8, code: u8) -> Self {
        Self {
            name,
            number,
            address,
            code,
            length: Length::Byte3,
            param: Vec::new(),
        }
    }

    /// A request carrying parameter bytes; `length` must match the
    /// parameter count (2 bytes for `Byte6`, 4 for `Byte9`).
    pub fn with_param(
        name: &'static str,
        number: u8,
        address: u8,
        code: u8,
        length: Length,
        param: Vec<u8>,
    ) -> Self {
        Self {
            name,
            number,
            address,
            code,
            length,
            param,
        }
    }

    /// Encode the request bytes for the wire.
    pub fn request(&self) -> Result<Vec<u8>> {
        let frame = Frame::new(
            self.address,
            self.code,
            Priority::NoPriority,
            self.length,
            Direction::FromMaster,
        );
        Ok(frame.encode(&self.param)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easybus_frame::FrameError;

    #[test]
    fn parameterless_request_is_one_triplet() {
        let command = Command::new("read measurement", 0, 1, 0);
        assert_eq!(command.request().unwrap(), vec![0xFE, 0x00, 0x3D]);
    }

    #[test]
    fn request_with_param_pairs() {
        let command =
            Command::with_param("set threshold", 7, 1, 5, Length::Byte6, vec![0x10, 0x20]);
        assert_eq!(command.request().unwrap().len(), 6);
    }

    #[test]
    fn param_count_mismatch_is_refused() {
        let command = Command::with_param("broken", 8, 1, 5, Length::Byte6, vec![0x10]);
        let err = command.request().unwrap_err();
        assert!(matches!(
            err,
            crate::DeviceError::Frame(FrameError::ParamCount { .. })
        ));
    }
}
