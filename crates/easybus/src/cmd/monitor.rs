use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use easybus_device::Answer;
use tracing::info;

use crate::cmd::{load_tables, open_device, parse_duration, MonitorArgs};
use crate::exit::{device_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_answer, OutputFormat};

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    let tables = load_tables(args.tables.as_ref())?;
    let mut device = open_device(&args.port, args.address, &args.timeout, &args.wait_time)?;

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .map_err(|err| CliError::new(INTERNAL, format!("failed installing signal handler: {err}")))?;

    let mut taken = 0u64;
    while running.load(Ordering::SeqCst) {
        let reading = device
            .read_measurement()
            .map_err(|err| device_error("measurement failed", err))?;
        print_answer("read measurement", &Answer::Value(reading), &tables, format);

        taken += 1;
        if args.count.is_some_and(|count| taken >= count) {
            break;
        }
        thread::sleep(interval);
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut values = 0u64;
    for measurement in device.measurements() {
        if let Some(value) = measurement.reading.value() {
            min = min.min(value);
            max = max.max(value);
            values += 1;
        }
    }

    if values > 0 {
        info!(readings = taken, values, min, max, "monitor finished");
    } else {
        info!(readings = taken, "monitor finished");
    }

    Ok(SUCCESS)
}
