use easybus_device::gmh3710;

use crate::cmd::ListArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_commands, OutputFormat};

pub fn run(args: ListArgs, format: OutputFormat) -> CliResult<i32> {
    let commands = gmh3710::commands(args.address);
    print_commands(&commands, format);
    Ok(SUCCESS)
}
