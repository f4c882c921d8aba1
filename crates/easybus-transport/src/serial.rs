use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::{DataBits, Parity, SerialPort, StopBits};
use tracing::{debug, info, trace};

use crate::connection::{Connection, SerialSettings};
use crate::error::{Result, TransportError};

/// Chunk size for draining variable-length replies.
const DRAIN_CHUNK: usize = 32;

/// A [`Connection`] over a real serial port.
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
    wait_time: Duration,
}

impl SerialConnection {
    /// Open and configure the port named in `settings`.
    pub fn open(settings: &SerialSettings) -> Result<Self> {
        if settings.port.is_empty() {
            return Err(TransportError::MissingPort);
        }

        let port = serialport::new(&settings.port, settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(settings.timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: settings.port.clone(),
                source,
            })?;

        info!(
            port = %settings.port,
            baud = settings.baud_rate,
            "opened serial port"
        );

        Ok(Self {
            port,
            wait_time: settings.wait_time,
        })
    }
}

impl Connection for SerialConnection {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        trace!(count = bytes.len(), "serial write");
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    fn receive_exact(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; count];
        let mut filled = 0;

        while filled < count {
            match self.port.read(&mut buffer[filled..]) {
                Ok(0) => {
                    return Err(TransportError::Timeout {
                        expected: count,
                        actual: filled,
                    });
                }
                Ok(read) => filled += read,
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error)
                    if error.kind() == ErrorKind::TimedOut
                        || error.kind() == ErrorKind::WouldBlock =>
                {
                    return Err(TransportError::Timeout {
                        expected: count,
                        actual: filled,
                    });
                }
                Err(error) => return Err(error.into()),
            }
        }

        trace!(count, "serial read");
        Ok(buffer)
    }

    fn receive_until_idle(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        let mut chunk = [0u8; DRAIN_CHUNK];

        loop {
            match self.port.read(&mut chunk) {
                Ok(0) => break,
                Ok(read) => data.extend_from_slice(&chunk[..read]),
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error)
                    if error.kind() == ErrorKind::TimedOut
                        || error.kind() == ErrorKind::WouldBlock =>
                {
                    break
                }
                Err(error) => return Err(error.into()),
            }
        }

        debug!(count = data.len(), "drained reply until idle");
        Ok(data)
    }

    fn wait(&mut self) {
        std::thread::sleep(self.wait_time);
    }
}
