use std::fs::File;

use serialpcm_frame::{CaptureLoop, StopFlag};
use serialpcm_source::SerialPort;

use crate::cmd::RecordArgs;
use crate::exit::{frame_error, io_error, source_error, CliError, CliResult, SUCCESS};
use crate::output::{print_summary, OutputFormat};

pub fn run(args: RecordArgs, format: OutputFormat) -> CliResult<i32> {
    // The device is opened first so an unavailable port leaves no output file behind.
    let port = SerialPort::open(&args.device).map_err(|err| source_error("open failed", err))?;
    let output = File::create(&args.output)
        .map_err(|err| io_error(&format!("create {} failed", args.output.display()), err))?;

    let stop = StopFlag::new();
    install_ctrlc_handler(stop.clone())?;

    tracing::info!(device = ?args.device, output = ?args.output, "recording");

    let mut capture = CaptureLoop::new(port, output);
    let result = capture.run(&stop);
    let summary = capture.summary();
    drop(capture);

    print_summary(&summary, &args.output, format);

    match result {
        Ok(_) => Ok(SUCCESS),
        Err(err) => Err(frame_error("capture failed", err)),
    }
}

fn install_ctrlc_handler(stop: StopFlag) -> CliResult<()> {
    ctrlc::set_handler(move || {
        stop.request_stop();
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
