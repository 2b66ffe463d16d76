use std::io::IsTerminal;
use std::path::Path;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serialpcm_frame::{CaptureSummary, SAMPLE_SIZE};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    output: String,
    bytes_written: u64,
    megabytes_written: u64,
    samples_written: u64,
    frames_written: u64,
    truncated_final_frame: bool,
    discarded_bytes: u64,
    stop_reason: Option<&'a str>,
}

impl<'a> SummaryOutput<'a> {
    fn new(summary: &'a CaptureSummary, output: &Path) -> Self {
        Self {
            output: output.display().to_string(),
            bytes_written: summary.bytes_written,
            megabytes_written: summary.bytes_written / 1024 / 1024,
            samples_written: summary.bytes_written / SAMPLE_SIZE as u64,
            frames_written: summary.frames_written,
            truncated_final_frame: summary.truncated_final_frame,
            discarded_bytes: summary.discarded_bytes,
            stop_reason: summary.stop_reason.map(|r| r.as_str()),
        }
    }
}

pub fn print_summary(summary: &CaptureSummary, output: &Path, format: OutputFormat) {
    let out = SummaryOutput::new(summary, output);
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OUTPUT", "BYTES", "FRAMES", "DISCARDED", "STOP"])
                .add_row(vec![
                    out.output.clone(),
                    out.bytes_written.to_string(),
                    frames_cell(&out),
                    out.discarded_bytes.to_string(),
                    out.stop_reason.unwrap_or("error").to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "Wrote {} bytes ({} MB) to {}",
                out.bytes_written, out.megabytes_written, out.output
            );
            println!(
                "  frames={} discarded={} stop={}",
                frames_cell(&out),
                out.discarded_bytes,
                out.stop_reason.unwrap_or("error")
            );
        }
        OutputFormat::Raw => {
            println!("{}", out.bytes_written);
        }
    }
}

fn frames_cell(out: &SummaryOutput<'_>) -> String {
    if out.truncated_final_frame {
        format!("{} (+1 truncated)", out.frames_written)
    } else {
        out.frames_written.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serialpcm_frame::StopReason;

    use super::*;

    #[test]
    fn summary_json_has_totals_and_reason() {
        let summary = CaptureSummary {
            bytes_written: 10_000,
            frames_written: 1,
            truncated_final_frame: true,
            discarded_bytes: 7,
            stop_reason: Some(StopReason::CapReached),
        };
        let path = PathBuf::from("audio.pcm24");
        let out = SummaryOutput::new(&summary, &path);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&out).unwrap()).unwrap();

        assert_eq!(json["bytes_written"], 10_000);
        assert_eq!(json["samples_written"], 3333);
        assert_eq!(json["stop_reason"], "cap-reached");
        assert_eq!(json["output"], "audio.pcm24");
        assert_eq!(frames_cell(&out), "1 (+1 truncated)");
    }

    #[test]
    fn failed_capture_has_null_reason() {
        let summary = CaptureSummary::default();
        let path = PathBuf::from("x");
        let out = SummaryOutput::new(&summary, &path);
        let json = serde_json::to_string(&out).unwrap();

        assert!(json.contains("\"stop_reason\":null"));
    }
}
