//! Driver for the GMH 3710 digital thermometer.

use std::time::SystemTime;

use easybus_frame::Reading;
use easybus_transport::Connection;
use tracing::info;

use crate::command::Command;
use crate::device::{exchange, Answer};
use crate::error::{DeviceError, Result};

/// Factory-default bus address.
pub const DEFAULT_ADDRESS: u8 = 1;

/// The command table of a GMH 3710 at the given address.
pub fn commands(address: u8) -> Vec<Command> {
    vec![
        Command::new("read measurement", 0, address, 0),
        Command::new("read system status", 1, address, 3),
        Command::new("read minimum value", 2, address, 6),
        Command::new("read maximum value", 3, address, 7),
        Command::new("read id number", 4, address, 12),
    ]
}

/// One logged measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub timestamp: SystemTime,
    pub reading: Reading,
}

/// A GMH 3710 thermometer on the bus.
///
/// Owns its connection; every successful measurement read is appended to an
/// in-memory log retrievable via [`Gmh3710::measurements`].
pub struct Gmh3710<C: Connection> {
    connection: C,
    address: u8,
    commands: Vec<Command>,
    measurements: Vec<Measurement>,
}

impl<C: Connection> Gmh3710<C> {
    pub fn new(connection: C, address: u8) -> Self {
        Self {
            connection,
            address,
            commands: commands(address),
            measurements: Vec::new(),
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// All commands this device understands.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Look up a command by its number.
    pub fn command(&self, number: u8) -> Option<&Command> {
        self.commands.iter().find(|c| c.number == number)
    }

    /// Run a command by number and decode its answer.
    pub fn run(&mut self, number: u8) -> Result<Answer> {
        let command = self
            .commands
            .iter()
            .find(|c| c.number == number)
            .ok_or(DeviceError::UnknownCommand { number })?;
        exchange(&mut self.connection, command)
    }

    fn run_for_value(&mut self, number: u8) -> Result<Reading> {
        match self.run(number)? {
            Answer::Value(reading) => Ok(reading),
            Answer::Ack | Answer::Series(_) => Err(DeviceError::UnexpectedAnswer { number }),
        }
    }

    /// Read the current measurement and append it to the log.
    pub fn read_measurement(&mut self) -> Result<Reading> {
        let reading = self.run_for_value(0)?;
        info!(address = self.address, ?reading, "measurement");

        self.measurements.push(Measurement {
            timestamp: SystemTime::now(),
            reading,
        });
        Ok(reading)
    }

    /// Read the system status word (interpret it against the status table).
    pub fn read_system_status(&mut self) -> Result<Reading> {
        self.run_for_value(1)
    }

    /// Read the stored minimum.
    pub fn read_minimum(&mut self) -> Result<Reading> {
        self.run_for_value(2)
    }

    /// Read the stored maximum.
    pub fn read_maximum(&mut self) -> Result<Reading> {
        self.run_for_value(3)
    }

    /// Read the instrument's id number.
    pub fn read_id_number(&mut self) -> Result<Reading> {
        self.run_for_value(4)
    }

    /// Measurements logged so far, oldest first.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Drop the measurement log.
    pub fn clear_measurements(&mut self) {
        self.measurements.clear();
    }
}
