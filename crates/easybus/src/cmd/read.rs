use easybus_device::Answer;
use easybus_frame::Reading;

use crate::cmd::{load_tables, open_device, ReadArgs};
use crate::exit::{device_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_answer, print_status, OutputFormat};

/// Command number whose answer is a status word rather than a measurement.
const SYSTEM_STATUS: u8 = 1;

pub fn run(args: ReadArgs, format: OutputFormat) -> CliResult<i32> {
    let tables = load_tables(args.tables.as_ref())?;
    let mut device = open_device(&args.port, args.address, &args.timeout, &args.wait_time)?;

    let name = device
        .command(args.number)
        .map(|command| command.name)
        .ok_or_else(|| CliError::new(USAGE, format!("unknown command number {}", args.number)))?;

    let answer = device
        .run(args.number)
        .map_err(|err| device_error("command failed", err))?;

    // The status word is a bitmask; expand it instead of printing a float.
    if args.number == SYSTEM_STATUS {
        if let Answer::Value(Reading::Value(word)) = answer {
            print_status(name, word as u32, &tables, format);
            return Ok(SUCCESS);
        }
    }

    print_answer(name, &answer, &tables, format);
    Ok(SUCCESS)
}
