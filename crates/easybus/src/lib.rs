//! EasyBus serial instrument protocol.
//!
//! Talks to GMH-series handheld instruments over their proprietary
//! half-duplex serial bus: 3-byte CRC-checked triplets, one's-complemented
//! lead bytes, and a fixed-point value format with embedded fault codes.
//!
//! # Crate Structure
//!
//! - [`frame`] — Wire codec: triplets, CRC-8, headers, value format
//! - [`tables`] — Error, status, and unit lookup tables
//! - [`transport`] — Serial port access behind a mockable trait
//! - [`device`] — Command tables, the exchange cycle, instrument drivers

/// Re-export wire codec types.
pub mod frame {
    pub use easybus_frame::*;
}

/// Re-export lookup table types.
pub mod tables {
    pub use easybus_tables::*;
}

/// Re-export transport types.
pub mod transport {
    pub use easybus_transport::*;
}

/// Re-export device driver types.
pub mod device {
    pub use easybus_device::*;
}
