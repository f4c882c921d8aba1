//! Half-duplex serial transport for EasyBus instruments.
//!
//! The bus is strictly send → wait → receive: the master writes a request,
//! pauses long enough for the instrument to answer, then drains the reply.
//! The [`Connection`] trait captures exactly that surface so the device
//! layer stays testable without hardware; [`SerialConnection`] implements
//! it over a real 4800-8N1 port.
//!
//! Nothing here understands the wire format — framing and checksums live
//! in `easybus-frame`.

pub mod connection;
pub mod error;
pub mod serial;

pub use connection::{Connection, SerialSettings};
pub use error::{Result, TransportError};
pub use serial::SerialConnection;
