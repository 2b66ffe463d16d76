use serialpcm_source::SourceError;

/// Errors that can occur while synchronizing, assembling or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The source ended after synchronization, before the frame was complete.
    #[error("stream ended mid-frame ({filled} of {expected} bytes received)")]
    StreamEndedMidFrame { filled: usize, expected: usize },

    /// The output accepted fewer bytes than requested.
    #[error("short write to output ({written} of {expected} bytes)")]
    ShortWrite { written: usize, expected: usize },

    /// An I/O error occurred while writing the output.
    #[error("output I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading from the byte source failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The capture configuration cannot be used.
    #[error("invalid capture configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, FrameError>;
