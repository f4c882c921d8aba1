//! Instrument error, status, and unit lookup tables.
//!
//! EasyBus instruments report faults as small integer codes and expose a
//! bitmask system status; this crate maps both to human-readable text, plus
//! unit codes to display strings. The tables are plain immutable values —
//! build one once at startup ([`Tables::builtin`] or [`Tables::from_file`])
//! and pass it by reference into whatever consumes decoded readings. There
//! is no process-global table state.

pub mod error;
pub mod tables;

pub use error::{Result, TableError};
pub use tables::{ErrorDescriptor, StatusDescriptor, Tables, UnitDescriptor};
