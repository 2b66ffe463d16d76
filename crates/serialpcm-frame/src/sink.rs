use std::io::{ErrorKind, Write};

use crate::error::{FrameError, Result};

/// What a single [`BoundedSink::write_frame`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Bytes of this frame that reached the output.
    pub bytes: usize,
    /// The frame was cut short to stay within the cap.
    pub truncated: bool,
    /// Running total after this write.
    pub written: u64,
    /// The running total has reached the cap.
    pub cap_reached: bool,
}

/// Writes frames to any `Write` output without exceeding a byte cap.
///
/// A frame that would cross the cap is truncated to end exactly on it. The
/// running total only moves after the write and flush have both succeeded.
pub struct BoundedSink<T> {
    inner: T,
    written: u64,
    max_bytes: u64,
}

impl<T: Write> BoundedSink<T> {
    /// Create a sink that accepts at most `max_bytes` in total.
    pub fn new(inner: T, max_bytes: u64) -> Self {
        Self {
            inner,
            written: 0,
            max_bytes,
        }
    }

    /// Write `frame`, truncated to the remaining budget (blocking).
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<WriteOutcome> {
        let remaining = self.remaining();
        let len = match u64::try_from(frame.len()) {
            Ok(len) if len <= remaining => frame.len(),
            _ => remaining as usize,
        };
        let truncated = len < frame.len();
        let data = &frame[..len];

        let mut offset = 0usize;
        while offset < data.len() {
            match self.inner.write(&data[offset..]) {
                Ok(0) => {
                    return Err(FrameError::ShortWrite {
                        written: offset,
                        expected: data.len(),
                    })
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()?;

        self.written += len as u64;
        Ok(WriteOutcome {
            bytes: len,
            truncated,
            written: self.written,
            cap_reached: self.is_cap_reached(),
        })
    }

    /// Flush the underlying output.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Total bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Configured byte cap.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Bytes that may still be written before the cap.
    pub fn remaining(&self) -> u64 {
        self.max_bytes.saturating_sub(self.written)
    }

    /// True once the running total has reached the cap.
    pub fn is_cap_reached(&self) -> bool {
        self.written >= self.max_bytes
    }

    /// Borrow the underlying output.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying output.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the sink and return the inner output.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
