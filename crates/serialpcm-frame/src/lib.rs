//! Frame synchronization and reassembly for marker-framed serial PCM.
//!
//! The device protocol has no length prefix and no checksum. Every frame is:
//! - A run of 4 marker bytes (`0x7F`) for stream synchronization
//! - 2000 samples of 24-bit PCM (6000 bytes)
//!
//! Marker bytes inside payload are not escaped; once synchronized, the next
//! 6000 bytes are taken as-is.

pub mod assembler;
pub mod capture;
pub mod config;
pub mod error;
pub mod sink;
pub mod sync;

pub use assembler::{Frame, FrameAssembler};
pub use capture::{CaptureLoop, CaptureState, CaptureSummary, StopFlag, StopReason};
pub use config::{
    CaptureConfig, DEFAULT_MAX_BYTES, FRAME_SAMPLES, FRAME_SIZE, MARKER_BYTE, MARKER_RUN_LEN,
    READ_BUFFER_SIZE, SAMPLE_SIZE,
};
pub use error::{FrameError, Result};
pub use sink::{BoundedSink, WriteOutcome};
pub use sync::{MarkerScanner, SyncResult};
