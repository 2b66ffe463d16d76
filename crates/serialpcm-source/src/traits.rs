use std::io::{ErrorKind, Read};

use crate::error::{Result, SourceError};

/// Outcome of a single read from a [`ByteSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk {
    /// `n > 0` bytes were placed at the front of the caller's buffer.
    Data(usize),
    /// The source has no more data (a zero-length read).
    EndOfStream,
}

/// A blocking producer of raw byte chunks.
///
/// One call performs at most one underlying read. Implementations block until
/// at least one byte is available or the stream has ended; no timeout is
/// applied.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes into `buf`.
    ///
    /// `buf` must not be empty: an empty buffer is indistinguishable from
    /// end of stream.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<Chunk>;
}

impl<T: Read + ?Sized> ByteSource for T {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<Chunk> {
        debug_assert!(!buf.is_empty(), "read_chunk called with an empty buffer");
        loop {
            match self.read(buf) {
                Ok(0) => return Ok(Chunk::EndOfStream),
                Ok(n) => return Ok(Chunk::Data(n)),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(SourceError::Io(err)),
            }
        }
    }
}
