mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "serialpcm", version, about = "Serial PCM frame capture CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "SERIALPCM_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
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
    use std::path::Path;

    use super::*;

    #[test]
    fn parses_record_with_paths() {
        let cli = Cli::try_parse_from([
            "serialpcm",
            "record",
            "--device",
            "/dev/ttyUSB1",
            "--output",
            "/tmp/take1.pcm24",
        ])
        .expect("record args should parse");

        match cli.command {
            Command::Record(args) => {
                assert_eq!(args.device, Path::new("/dev/ttyUSB1"));
                assert_eq!(args.output, Path::new("/tmp/take1.pcm24"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn record_output_defaults_to_pcm24() {
        let cli = Cli::try_parse_from(["serialpcm", "record", "-d", "/dev/ttyACM3"])
            .expect("record args should parse");

        match cli.command {
            Command::Record(args) => assert_eq!(args.output, Path::new(cmd::DEFAULT_OUTPUT)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "serialpcm",
            "doctor",
            "--format",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("doctor args should parse");

        assert!(matches!(cli.command, Command::Doctor(_)));
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn rejects_capture_constants_as_flags() {
        let err = Cli::try_parse_from(["serialpcm", "record", "--max-bytes", "10"])
            .expect_err("capture constants are not runtime options");

        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
