use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use easybus_device::{Answer, Command};
use easybus_frame::{Length, Reading};
use easybus_tables::Tables;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReadingOutput<'a> {
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fault_code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fault_text: Option<String>,
}

impl<'a> ReadingOutput<'a> {
    fn new(command: &'a str, reading: Reading, tables: &Tables) -> Self {
        match reading {
            Reading::Value(value) => Self {
                command,
                value: Some(value),
                fault_code: None,
                fault_text: None,
            },
            Reading::Fault(code) => Self {
                command,
                value: None,
                fault_code: Some(code),
                fault_text: Some(tables.error_text(code)),
            },
        }
    }
}

/// Print a decoded answer on stdout.
pub fn print_answer(command: &str, answer: &Answer, tables: &Tables, format: OutputFormat) {
    match answer {
        Answer::Ack => print_ack(command, format),
        Answer::Value(reading) => print_readings(command, &[*reading], tables, format),
        Answer::Series(readings) => print_readings(command, readings, tables, format),
    }
}

fn print_ack(command: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "command": command, "ack": true }));
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{command}: acknowledged");
        }
    }
}

fn print_readings(command: &str, readings: &[Reading], tables: &Tables, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for &reading in readings {
                let out = ReadingOutput::new(command, reading, tables);
                println!(
                    "{}",
                    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "VALUE", "FAULT"]);
            for &reading in readings {
                table.add_row(vec![
                    command.to_string(),
                    reading
                        .value()
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    reading
                        .fault()
                        .map(|code| format!("{} ({code})", tables.error_text(code)))
                        .unwrap_or_else(|| "-".to_string()),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for &reading in readings {
                match reading {
                    Reading::Value(value) => println!("{command}: {value}"),
                    Reading::Fault(code) => {
                        println!("{command}: fault {code} ({})", tables.error_text(code));
                    }
                }
            }
        }
    }
}

/// Print the set status flags of a system-status word.
pub fn print_status(command: &str, word: u32, tables: &Tables, format: OutputFormat) {
    let flags = tables.status_bits(word);

    match format {
        OutputFormat::Json => {
            let texts: Vec<&str> = flags.iter().map(|flag| flag.text.as_str()).collect();
            println!(
                "{}",
                serde_json::json!({ "command": command, "status": word, "flags": texts })
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["BIT", "STATUS"]);
            for flag in &flags {
                table.add_row(vec![format!("{:#06x}", flag.bit), flag.text.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if flags.is_empty() {
                println!("{command}: no flags set");
            }
            for flag in &flags {
                println!("{command}: {}", flag.text);
            }
        }
    }
}

/// Print a device's command table.
pub fn print_commands(commands: &[Command], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for command in commands {
                println!(
                    "{}",
                    serde_json::json!({
                        "number": command.number,
                        "name": command.name,
                        "address": command.address,
                        "code": command.code,
                        "length": length_name(command.length),
                    })
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NUMBER", "NAME", "CODE", "LENGTH"]);
            for command in commands {
                table.add_row(vec![
                    command.number.to_string(),
                    command.name.to_string(),
                    command.code.to_string(),
                    length_name(command.length).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for command in commands {
                println!(
                    "{}: {} (code {}, {})",
                    command.number,
                    command.name,
                    command.code,
                    length_name(command.length)
                );
            }
        }
    }
}

pub fn length_name(length: Length) -> &'static str {
    match length {
        Length::Byte3 => "3 bytes",
        Length::Byte6 => "6 bytes",
        Length::Byte9 => "9 bytes",
        Length::Variable => "variable",
    }
}
