#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::Command;

use serialpcm::frame::{FRAME_SIZE, MARKER_BYTE};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "serialpcm-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn framed(fill: u8) -> Vec<u8> {
    let mut out = vec![MARKER_BYTE; 4];
    out.extend(std::iter::repeat(fill).take(FRAME_SIZE));
    out
}

fn record(device: &PathBuf, output: &PathBuf) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_serialpcm"))
        .env_remove("SERIALPCM_DEVICE")
        .arg("--log-level")
        .arg("error")
        .arg("--format")
        .arg("json")
        .arg("record")
        .arg("--device")
        .arg(device)
        .arg("--output")
        .arg(output)
        .output()
        .expect("record command should run")
}

#[test]
fn record_replays_dump_into_output() {
    let dir = unique_temp_dir("replay");
    let dump = dir.join("node.raw");
    let out = dir.join("audio.pcm24");

    let mut stream = vec![0x01, 0x02, 0x03];
    stream.extend(framed(0x10));
    stream.extend_from_slice(&[0x55; 9]);
    stream.extend(framed(0x20));
    stream.extend(framed(0x30));
    std::fs::write(&dump, &stream).expect("dump should be writable");

    let output = record(&dump, &out);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("summary should be json");
    assert_eq!(summary["bytes_written"], 3 * FRAME_SIZE as u64);
    assert_eq!(summary["frames_written"], 3);
    assert_eq!(summary["discarded_bytes"], 12);
    assert_eq!(summary["stop_reason"], "stream-ended");

    let pcm = std::fs::read(&out).expect("output should exist");
    assert_eq!(pcm.len(), 3 * FRAME_SIZE);
    assert!(pcm[..FRAME_SIZE].iter().all(|&b| b == 0x10));
    assert!(pcm[FRAME_SIZE..2 * FRAME_SIZE].iter().all(|&b| b == 0x20));
    assert!(pcm[2 * FRAME_SIZE..].iter().all(|&b| b == 0x30));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn record_reports_mid_frame_end_and_keeps_earlier_frames() {
    let dir = unique_temp_dir("midframe");
    let dump = dir.join("node.raw");
    let out = dir.join("audio.pcm24");

    let mut stream = framed(0x11);
    let mut partial = framed(0x22);
    partial.truncate(100);
    stream.extend(partial);
    std::fs::write(&dump, &stream).expect("dump should be writable");

    let output = record(&dump, &out);
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("stream ended mid-frame"));

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("summary should still be printed");
    assert_eq!(summary["frames_written"], 1);
    assert!(summary["stop_reason"].is_null());

    let pcm = std::fs::read(&out).expect("output should exist");
    assert_eq!(pcm, vec![0x11; FRAME_SIZE]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn record_with_missing_device_creates_no_output() {
    let dir = unique_temp_dir("nodevice");
    let out = dir.join("audio.pcm24");

    let output = record(&dir.join("ttyACM-missing"), &out);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("open failed"));
    assert!(!out.exists(), "output must not be created before the device opens");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn doctor_json_reports_checks() {
    let dir = unique_temp_dir("doctor");
    let dump = dir.join("node.raw");
    std::fs::write(&dump, framed(0x01)).expect("dump should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_serialpcm"))
        .env_remove("SERIALPCM_DEVICE")
        .args(["--log-level", "error", "--format", "json", "doctor", "--device"])
        .arg(&dump)
        .arg("--output")
        .arg(dir.join("audio.pcm24"))
        .output()
        .expect("doctor should run");

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("doctor output should be json");
    assert_eq!(report["overall"], "pass");
    assert_eq!(report["checks"].as_array().map(Vec::len), Some(4));

    let _ = std::fs::remove_dir_all(&dir);
}
