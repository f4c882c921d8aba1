use easybus_frame::FrameError;
use easybus_transport::TransportError;

/// Errors that can occur while talking to an instrument.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The answer header claims the master sent it.
    #[error("answer header is not marked as coming from the instrument")]
    NotFromInstrument,

    /// No command with this number exists on the device.
    #[error("unknown command number {number}")]
    UnknownCommand { number: u8 },

    /// The answer carried fewer triplets than its length class declares.
    #[error("answer is shorter than its declared length class")]
    ShortAnswer,

    /// A command that must return a value got an acknowledge or a series.
    #[error("command {number} answered with the wrong shape")]
    UnexpectedAnswer { number: u8 },
}

pub type Result<T> = std::result::Result<T, DeviceError>;
