use crate::config::{MARKER_BYTE, MARKER_RUN_LEN};

/// Result of scanning one chunk for a frame boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncResult {
    /// The whole chunk was consumed without completing a marker run.
    NotSynchronized,
    /// A marker run completed inside the chunk.
    Synchronized {
        /// Index of the first byte after the last marker byte.
        offset: usize,
        /// Bytes consumed before the winning marker run began, counted
        /// across every chunk scanned since the last synchronization.
        discarded: u64,
    },
}

/// Resumable scanner for the frame marker run.
///
/// The run counter survives between [`scan`](Self::scan) calls so a marker
/// run split across two reads is still found. Any non-marker byte resets the
/// run to zero, and scanning stops the instant the run is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerScanner {
    marker: u8,
    run: usize,
    consumed: u64,
}

impl MarkerScanner {
    /// Create a scanner for the given marker byte value.
    pub fn new(marker: u8) -> Self {
        Self {
            marker,
            run: 0,
            consumed: 0,
        }
    }

    /// Scan `chunk` left to right.
    pub fn scan(&mut self, chunk: &[u8]) -> SyncResult {
        for (i, &byte) in chunk.iter().enumerate() {
            if byte == self.marker {
                self.run += 1;
            } else {
                self.run = 0;
            }

            if self.run == MARKER_RUN_LEN {
                let offset = i + 1;
                let discarded = self.consumed + offset as u64 - MARKER_RUN_LEN as u64;
                self.reset();
                return SyncResult::Synchronized { offset, discarded };
            }
        }

        self.consumed += chunk.len() as u64;
        SyncResult::NotSynchronized
    }

    /// Forget any partial run and discarded-byte count.
    pub fn reset(&mut self) {
        self.run = 0;
        self.consumed = 0;
    }

    /// Consecutive marker bytes seen at the end of the last scanned chunk.
    pub fn run_len(&self) -> usize {
        self.run
    }

    /// Bytes consumed since the last synchronization.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Marker byte value this scanner looks for.
    pub fn marker(&self) -> u8 {
        self.marker
    }
}

impl Default for MarkerScanner {
    fn default() -> Self {
        Self::new(MARKER_BYTE)
    }
}
