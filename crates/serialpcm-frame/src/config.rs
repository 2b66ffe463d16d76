//! Capture constants.
//!
//! These are fixed properties of the device protocol, not runtime options.

/// Byte value that, repeated [`MARKER_RUN_LEN`] times, starts an audio frame.
pub const MARKER_BYTE: u8 = 0x7F;

/// Number of consecutive marker bytes that make a frame boundary.
pub const MARKER_RUN_LEN: usize = 4;

/// Samples per audio frame.
pub const FRAME_SAMPLES: usize = 2000;

/// Bytes per sample (24-bit PCM).
pub const SAMPLE_SIZE: usize = 3;

/// Payload bytes per audio frame.
pub const FRAME_SIZE: usize = FRAME_SAMPLES * SAMPLE_SIZE;

/// Output ceiling: 256 MiB, a bit over 45 minutes at 32 kHz.
pub const DEFAULT_MAX_BYTES: u64 = 256 * 1024 * 1024;

/// Size of a single read from the device. Large enough for a full frame.
pub const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Parameters of one capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Marker byte value. Default: `0x7F`.
    pub marker: u8,
    /// Frame payload length in bytes. Default: 6000.
    pub frame_size: usize,
    /// Maximum total bytes written to the output. Default: 256 MiB.
    pub max_bytes: u64,
    /// Capacity of the read buffer used while searching. Default: 8 KiB.
    pub read_buffer_size: usize,
}

impl CaptureConfig {
    pub(crate) fn validate(&self) -> crate::Result<()> {
        if self.frame_size == 0 {
            return Err(crate::FrameError::InvalidConfig("frame size must be non-zero"));
        }
        if self.read_buffer_size == 0 {
            return Err(crate::FrameError::InvalidConfig(
                "read buffer size must be non-zero",
            ));
        }
        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            marker: MARKER_BYTE,
            frame_size: FRAME_SIZE,
            max_bytes: DEFAULT_MAX_BYTES,
            read_buffer_size: READ_BUFFER_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_device_protocol() {
        let cfg = CaptureConfig::default();
        assert_eq!(cfg.marker, 0x7F);
        assert_eq!(cfg.frame_size, 6000);
        assert_eq!(cfg.max_bytes, 268_435_456);
        assert!(cfg.read_buffer_size >= cfg.frame_size);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let cfg = CaptureConfig {
            frame_size: 0,
            ..CaptureConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = CaptureConfig {
            read_buffer_size: 0,
            ..CaptureConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
