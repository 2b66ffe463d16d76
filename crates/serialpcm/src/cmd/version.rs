use serialpcm_frame::{DEFAULT_MAX_BYTES, FRAME_SAMPLES, MARKER_BYTE, MARKER_RUN_LEN, SAMPLE_SIZE};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("serialpcm {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: serialpcm");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target: {}", option_env!("SERIALPCM_BUILD_TARGET").unwrap_or("unknown"));
    println!("profile: {}", option_env!("SERIALPCM_BUILD_PROFILE").unwrap_or("unknown"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "protocol: marker=0x{MARKER_BYTE:02X}x{MARKER_RUN_LEN} frame={FRAME_SAMPLES}x{SAMPLE_SIZE}B cap={}MiB",
        DEFAULT_MAX_BYTES / 1024 / 1024
    );

    Ok(SUCCESS)
}
