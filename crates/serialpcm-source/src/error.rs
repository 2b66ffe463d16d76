use std::path::PathBuf;

/// Errors that can occur while opening or reading a byte source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The device could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The device opened but its line discipline could not be configured.
    #[error("failed to configure {path}: {source}")]
    Configure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred while reading from the source.
    #[error("source I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// True when the source never became usable (open/configure failures).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SourceError::Open { .. } | SourceError::Configure { .. })
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
