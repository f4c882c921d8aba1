/// Errors that can occur on the serial transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The serial port could not be opened or configured.
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// No port name was configured.
    #[error("serial port is missing/not configured")]
    MissingPort,

    /// An I/O error occurred while reading or writing.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The instrument did not deliver the expected byte count in time.
    #[error("timed out waiting for {expected} bytes (got {actual})")]
    Timeout { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, TransportError>;
