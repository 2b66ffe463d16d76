//! Byte sources for serial PCM capture.
//!
//! Provides the lowest layer of serialpcm: something that hands out raw,
//! unstructured byte chunks on demand.
//! - [`ByteSource`] is implemented for every [`std::io::Read`]
//! - [`SerialPort`] opens a USB-CDC / tty device in raw blocking mode (Unix)
//!
//! Everything else builds on top of the [`Chunk`] results produced here.

pub mod error;
pub mod traits;

#[cfg(unix)]
pub mod serial;

pub use error::{Result, SourceError};
pub use traits::{ByteSource, Chunk};

#[cfg(unix)]
pub use serial::SerialPort;
