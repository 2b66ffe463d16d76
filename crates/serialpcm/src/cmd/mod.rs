use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod doctor;
pub mod record;
pub mod version;

/// Default device: the first USB-CDC ACM port.
pub const DEFAULT_DEVICE: &str = serialpcm_source::SerialPort::DEFAULT_PATH;

/// Default output file: headerless 24-bit PCM.
pub const DEFAULT_OUTPUT: &str = "audio.pcm24";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Capture audio frames from the device into a capped PCM file.
    Record(RecordArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Record(args) => record::run(args, format),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Serial device (or recorded raw dump) to read from.
    #[arg(long, short = 'd', env = "SERIALPCM_DEVICE", default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,
    /// Output file for the reassembled PCM payload (truncated if it exists).
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Serial device to probe.
    #[arg(long, short = 'd', env = "SERIALPCM_DEVICE", default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,
    /// Output file whose directory must be writable.
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
