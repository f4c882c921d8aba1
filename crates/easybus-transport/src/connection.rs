use std::time::Duration;

use crate::error::Result;

/// Default bus speed. The instruments speak 4800 baud, 8N1, fixed.
pub const DEFAULT_BAUD_RATE: u32 = 4800;

/// Default read timeout before a pending reply counts as absent.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default pause between writing a request and draining the reply.
pub const DEFAULT_WAIT_TIME: Duration = Duration::from_millis(100);

/// Settings for opening a serial connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    /// Port name, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    pub baud_rate: u32,
    /// Read timeout; also the idle gap that ends a variable-length reply.
    pub timeout: Duration,
    /// Pause between request and reply on the half-duplex bus.
    pub wait_time: Duration,
}

impl SerialSettings {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            wait_time: DEFAULT_WAIT_TIME,
        }
    }
}

/// Byte-level access to the instrument bus.
///
/// The device layer drives every exchange through this trait, so tests can
/// substitute a scripted implementation for the real port.
pub trait Connection {
    /// Write a complete request to the bus.
    fn send(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read exactly `count` bytes, failing on timeout.
    fn receive_exact(&mut self, count: usize) -> Result<Vec<u8>>;

    /// Drain bytes until the line goes idle.
    ///
    /// Used for the variable length class, where the reply length is only
    /// known once the instrument stops talking. An empty result is valid
    /// here; the caller decides whether silence is an error.
    fn receive_until_idle(&mut self) -> Result<Vec<u8>>;

    /// Pause long enough for the instrument to turn the line around.
    fn wait(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_bus_parameters() {
        let settings = SerialSettings::new("/dev/ttyUSB0");
        assert_eq!(settings.port, "/dev/ttyUSB0");
        assert_eq!(settings.baud_rate, 4800);
        assert_eq!(settings.timeout, Duration::from_secs(3));
        assert_eq!(settings.wait_time, Duration::from_millis(100));
    }
}
