//! Command tables and instrument drivers.
//!
//! Sits on top of `easybus-frame` (the codec) and `easybus-transport` (the
//! port): a [`Command`] describes one request an instrument understands,
//! [`exchange`] runs the request/answer cycle over any [`Connection`], and
//! [`Gmh3710`] wires both together for the GMH 3710 thermometer.
//!
//! [`Connection`]: easybus_transport::Connection

pub mod command;
pub mod device;
pub mod error;
pub mod gmh3710;

pub use command::Command;
pub use device::{exchange, Answer};
pub use error::{DeviceError, Result};
pub use gmh3710::{Gmh3710, Measurement, DEFAULT_ADDRESS};

pub use easybus_frame::Reading;
