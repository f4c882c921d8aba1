mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "easybus", version, about = "EasyBus instrument CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_read_subcommand() {
        let cli = Cli::try_parse_from([
            "easybus",
            "read",
            "/dev/ttyUSB0",
            "--address",
            "2",
            "--number",
            "3",
        ])
        .expect("read args should parse");

        match cli.command {
            Command::Read(args) => {
                assert_eq!(args.port, "/dev/ttyUSB0");
                assert_eq!(args.address, 2);
                assert_eq!(args.number, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn read_defaults_to_address_one_command_zero() {
        let cli = Cli::try_parse_from(["easybus", "read", "/dev/ttyUSB0"])
            .expect("read args should parse");

        match cli.command {
            Command::Read(args) => {
                assert_eq!(args.address, 1);
                assert_eq!(args.number, 0);
                assert_eq!(args.timeout, "3s");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_monitor_with_count_and_interval() {
        let cli = Cli::try_parse_from([
            "easybus",
            "monitor",
            "/dev/ttyUSB0",
            "--interval",
            "500ms",
            "--count",
            "10",
        ])
        .expect("monitor args should parse");

        match cli.command {
            Command::Monitor(args) => {
                assert_eq!(args.interval, "500ms");
                assert_eq!(args.count, Some(10));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_needs_no_port() {
        let cli = Cli::try_parse_from(["easybus", "list", "--address", "5"])
            .expect("list args should parse");
        assert!(matches!(cli.command, Command::List(_)));
    }

    #[test]
    fn rejects_unknown_format() {
        let err = Cli::try_parse_from(["easybus", "--format", "xml", "list"])
            .expect_err("unknown format should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
