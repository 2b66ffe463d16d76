use std::path::{Path, PathBuf};

use serde::Serialize;
use serialpcm_frame::{DEFAULT_MAX_BYTES, FRAME_SIZE, MARKER_BYTE, MARKER_RUN_LEN};

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Info,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let checks = vec![
        platform_serial_check(),
        device_check(&args.device),
        output_dir_writable_check(&args.output),
        protocol_constants_check(),
    ];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput { checks, overall };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("serialpcm doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<20} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "WARN",
        CheckStatus::Info => "INFO",
    }
}

fn platform_serial_check() -> CheckResult {
    #[cfg(unix)]
    {
        CheckResult {
            name: "platform_serial".to_string(),
            status: CheckStatus::Pass,
            detail: "termios serial ports available".to_string(),
        }
    }

    #[cfg(not(unix))]
    {
        CheckResult {
            name: "platform_serial".to_string(),
            status: CheckStatus::Fail,
            detail: "serial capture is only implemented for Unix termios".to_string(),
        }
    }
}

fn device_check(path: &Path) -> CheckResult {
    let name = "device".to_string();

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => {
            return CheckResult {
                name,
                status: CheckStatus::Fail,
                detail: format!("{}: {err}", path.display()),
            }
        }
    };

    if metadata.is_dir() {
        return CheckResult {
            name,
            status: CheckStatus::Fail,
            detail: format!("{} is a directory", path.display()),
        };
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;

        match serialpcm_source::SerialPort::open(path) {
            Ok(port) if port.is_terminal() => CheckResult {
                name,
                status: CheckStatus::Pass,
                detail: format!("{} opened and configured raw", path.display()),
            },
            Ok(_) if metadata.file_type().is_char_device() => CheckResult {
                name,
                status: CheckStatus::Warn,
                detail: format!(
                    "{} is a character device but not a terminal",
                    path.display()
                ),
            },
            Ok(_) => CheckResult {
                name,
                status: CheckStatus::Warn,
                detail: format!(
                    "{} is not a terminal; it will be replayed as a raw dump",
                    path.display()
                ),
            },
            Err(err) => CheckResult {
                name,
                status: CheckStatus::Fail,
                detail: err.to_string(),
            },
        }
    }

    #[cfg(not(unix))]
    {
        CheckResult {
            name,
            status: CheckStatus::Fail,
            detail: format!("{} exists but cannot be opened here", path.display()),
        }
    }
}

fn output_dir_writable_check(output: &Path) -> CheckResult {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let probe = dir.join(format!(".serialpcm-doctor-{}", std::process::id()));

    let result = std::fs::write(&probe, b"");
    let _ = std::fs::remove_file(&probe);

    match result {
        Ok(()) => CheckResult {
            name: "output_dir_writable".to_string(),
            status: CheckStatus::Pass,
            detail: format!("{} is writable", dir.display()),
        },
        Err(err) => CheckResult {
            name: "output_dir_writable".to_string(),
            status: CheckStatus::Fail,
            detail: format!("{}: {err}", dir.display()),
        },
    }
}

fn protocol_constants_check() -> CheckResult {
    CheckResult {
        name: "protocol".to_string(),
        status: CheckStatus::Info,
        detail: format!(
            "marker 0x{MARKER_BYTE:02X} x{MARKER_RUN_LEN}, frame {FRAME_SIZE} bytes, cap {} MiB",
            DEFAULT_MAX_BYTES / 1024 / 1024
        ),
    }
}
