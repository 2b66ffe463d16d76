use bytes::{Bytes, BytesMut};
use serialpcm_source::{ByteSource, Chunk};

use crate::error::{FrameError, Result};

/// One complete (or cap-truncated) frame of PCM payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: Bytes,
}

impl Frame {
    /// Wrap an already assembled payload.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// True if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// The payload bytes.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.payload
    }
}

/// Builds fixed-size frames from the bytes that follow a marker run.
///
/// Assembly is two-step: [`begin`](Self::begin) seeds the buffer with the
/// tail of the chunk in which the marker run ended, then
/// [`fill_from`](Self::fill_from) reads whatever is still missing. Payload
/// bytes are never inspected for markers.
#[derive(Debug)]
pub struct FrameAssembler {
    frame_size: usize,
    buf: BytesMut,
    filled: usize,
}

impl FrameAssembler {
    /// Create an assembler for frames of `frame_size` bytes.
    pub fn new(frame_size: usize) -> Self {
        Self {
            frame_size,
            buf: BytesMut::with_capacity(frame_size),
            filled: 0,
        }
    }

    /// Start a fresh frame from `tail`.
    ///
    /// Copies at most one frame's worth of bytes and returns how many were
    /// taken. Anything left in `tail` belongs to the stream after this frame.
    pub fn begin(&mut self, tail: &[u8]) -> usize {
        self.buf.clear();
        self.buf.resize(self.frame_size, 0);

        let take = tail.len().min(self.frame_size);
        self.buf[..take].copy_from_slice(&tail[..take]);
        self.filled = take;
        take
    }

    /// Read from `source` until the frame is complete.
    ///
    /// Each read asks only for the bytes still missing. If the source ends
    /// or fails first, the partial frame is dropped and the error returned.
    pub fn fill_from<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<Frame> {
        while self.filled < self.frame_size {
            match source.read_chunk(&mut self.buf[self.filled..]) {
                Ok(Chunk::Data(n)) => self.filled += n,
                Ok(Chunk::EndOfStream) => {
                    let filled = self.filled;
                    self.discard();
                    return Err(FrameError::StreamEndedMidFrame {
                        filled,
                        expected: self.frame_size,
                    });
                }
                Err(err) => {
                    self.discard();
                    return Err(err.into());
                }
            }
        }

        self.filled = 0;
        Ok(Frame::new(self.buf.split().freeze()))
    }

    /// Drop any partially assembled frame.
    pub fn discard(&mut self) {
        self.buf.clear();
        self.filled = 0;
    }

    /// Bytes of the current frame received so far.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Configured frame length.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }
}
