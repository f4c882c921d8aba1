use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use easybus_device::Gmh3710;
use easybus_tables::Tables;
use easybus_transport::{SerialConnection, SerialSettings};

use crate::exit::{table_error, transport_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod list;
pub mod monitor;
pub mod read;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the instrument's command table.
    List(ListArgs),
    /// Run one command against the instrument and print its answer.
    Read(ReadArgs),
    /// Read measurements repeatedly until interrupted.
    Monitor(MonitorArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::List(args) => list::run(args, format),
        Command::Read(args) => read::run(args, format),
        Command::Monitor(args) => monitor::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Instrument bus address.
    #[arg(long, short = 'a', default_value = "1")]
    pub address: u8,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Serial port, e.g. /dev/ttyUSB0.
    pub port: String,
    /// Instrument bus address.
    #[arg(long, short = 'a', default_value = "1")]
    pub address: u8,
    /// Command number to run (see `list`).
    #[arg(long, short = 'n', default_value = "0")]
    pub number: u8,
    /// Read timeout (e.g. 3s, 500ms).
    #[arg(long, default_value = "3s")]
    pub timeout: String,
    /// Line turnaround pause between request and answer.
    #[arg(long, default_value = "100ms")]
    pub wait_time: String,
    /// Table file overriding the built-in error/status/unit tables.
    #[arg(long, value_name = "FILE")]
    pub tables: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Serial port, e.g. /dev/ttyUSB0.
    pub port: String,
    /// Instrument bus address.
    #[arg(long, short = 'a', default_value = "1")]
    pub address: u8,
    /// Pause between reads (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s")]
    pub interval: String,
    /// Stop after this many readings.
    #[arg(long)]
    pub count: Option<u64>,
    /// Read timeout (e.g. 3s, 500ms).
    #[arg(long, default_value = "3s")]
    pub timeout: String,
    /// Line turnaround pause between request and answer.
    #[arg(long, default_value = "100ms")]
    pub wait_time: String,
    /// Table file overriding the built-in error/status/unit tables.
    #[arg(long, value_name = "FILE")]
    pub tables: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}

/// Open the port and attach a GMH 3710 driver to it.
pub fn open_device(
    port: &str,
    address: u8,
    timeout: &str,
    wait_time: &str,
) -> CliResult<Gmh3710<SerialConnection>> {
    let mut settings = SerialSettings::new(port);
    settings.timeout = parse_duration(timeout)?;
    settings.wait_time = parse_duration(wait_time)?;

    let connection = SerialConnection::open(&settings)
        .map_err(|err| transport_error("failed opening port", err))?;
    Ok(Gmh3710::new(connection, address))
}

/// Load the lookup tables, either built-in or from an override file.
pub fn load_tables(path: Option<&PathBuf>) -> CliResult<Tables> {
    let result = match path {
        Some(path) => Tables::from_file(path),
        None => Tables::builtin(),
    };
    result.map_err(|err| table_error("failed loading tables", err))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(match unit {
        "ms" => Duration::from_millis(value),
        _ => Duration::from_secs(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_accepts_seconds_and_millis() {
        assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("2").unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn parse_duration_rejects_zero_and_garbage() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("abc").is_err());
    }
}
