use std::io::Write;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serialpcm_source::{ByteSource, Chunk};
use tracing::{debug, info, warn};

use crate::assembler::FrameAssembler;
use crate::config::CaptureConfig;
use crate::error::Result;
use crate::sink::BoundedSink;
use crate::sync::{MarkerScanner, SyncResult};

/// Cooperative shutdown request shared with a signal handler.
///
/// One side calls [`request_stop`](Self::request_stop); the capture loop
/// polls it between frames. A blocked read is never interrupted.
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    requested: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Where the capture loop is in the current frame cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Looking for the next marker run.
    Searching,
    /// Synchronized; the frame payload is being assembled and written.
    Filling,
    /// Finished. No further reads or writes happen.
    Done,
}

/// Why a capture finished without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stop flag was observed at a frame boundary.
    StopRequested,
    /// The source reported end of stream while searching.
    StreamEnded,
    /// The output reached its byte cap.
    CapReached,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::StopRequested => "stop-requested",
            StopReason::StreamEnded => "stream-ended",
            StopReason::CapReached => "cap-reached",
        }
    }
}

/// Running totals of a capture session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureSummary {
    /// Payload bytes written to the output.
    pub bytes_written: u64,
    /// Frames written in full.
    pub frames_written: u64,
    /// The last write was cut short by the byte cap.
    pub truncated_final_frame: bool,
    /// Bytes skipped while searching for marker runs.
    pub discarded_bytes: u64,
    /// Set once the loop finishes without error.
    pub stop_reason: Option<StopReason>,
}

/// Synchronize → assemble → bounded write, one frame per cycle.
///
/// The loop owns the source, the sink and every buffer it uses. Bytes left in
/// the read buffer after a frame completed from a single chunk are scanned
/// before the next read.
pub struct CaptureLoop<S, W> {
    source: S,
    sink: BoundedSink<W>,
    scanner: MarkerScanner,
    assembler: FrameAssembler,
    read_buf: Box<[u8]>,
    pending: Range<usize>,
    frame_start: usize,
    state: CaptureState,
    summary: CaptureSummary,
}

impl<S: ByteSource, W: Write> CaptureLoop<S, W> {
    /// Create a loop with the default device parameters.
    pub fn new(source: S, output: W) -> Self {
        let config = CaptureConfig::default();
        Self::build(source, output, &config)
    }

    /// Create a loop with explicit parameters.
    pub fn with_config(source: S, output: W, config: &CaptureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(source, output, config))
    }

    fn build(source: S, output: W, config: &CaptureConfig) -> Self {
        Self {
            source,
            sink: BoundedSink::new(output, config.max_bytes),
            scanner: MarkerScanner::new(config.marker),
            assembler: FrameAssembler::new(config.frame_size),
            read_buf: vec![0u8; config.read_buffer_size].into_boxed_slice(),
            pending: 0..0,
            frame_start: 0,
            state: CaptureState::Searching,
            summary: CaptureSummary::default(),
        }
    }

    /// Run until a stop condition or a fatal error.
    ///
    /// Totals are logged on every exit path and stay available through
    /// [`summary`](Self::summary) after an error.
    pub fn run(&mut self, stop: &StopFlag) -> Result<CaptureSummary> {
        loop {
            match self.step(stop) {
                Ok(CaptureState::Done) => {
                    info!(
                        bytes_written = self.summary.bytes_written,
                        frames_written = self.summary.frames_written,
                        discarded_bytes = self.summary.discarded_bytes,
                        reason = self.summary.stop_reason.map(StopReason::as_str),
                        "capture finished"
                    );
                    return Ok(self.summary);
                }
                Ok(_) => continue,
                Err(err) => {
                    warn!(
                        error = %err,
                        bytes_written = self.summary.bytes_written,
                        frames_written = self.summary.frames_written,
                        "capture aborted"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Perform one state transition and return the new state.
    ///
    /// A fatal error moves the loop to [`CaptureState::Done`].
    pub fn step(&mut self, stop: &StopFlag) -> Result<CaptureState> {
        let result = match self.state {
            CaptureState::Searching => self.search(stop),
            CaptureState::Filling => self.fill(),
            CaptureState::Done => Ok(CaptureState::Done),
        };

        self.state = match result {
            Ok(next) => next,
            Err(_) => CaptureState::Done,
        };
        result
    }

    fn search(&mut self, stop: &StopFlag) -> Result<CaptureState> {
        if stop.is_stop_requested() {
            return Ok(self.finish(StopReason::StopRequested));
        }

        if self.pending.is_empty() {
            match self.source.read_chunk(&mut self.read_buf)? {
                Chunk::Data(n) => self.pending = 0..n,
                Chunk::EndOfStream => return Ok(self.finish(StopReason::StreamEnded)),
            }
        }

        match self.scanner.scan(&self.read_buf[self.pending.clone()]) {
            SyncResult::NotSynchronized => {
                self.pending = 0..0;
                Ok(CaptureState::Searching)
            }
            SyncResult::Synchronized { offset, discarded } => {
                if discarded > 0 {
                    debug!(discarded, "dropped bytes before frame marker");
                }
                self.summary.discarded_bytes += discarded;
                self.frame_start = self.pending.start + offset;
                Ok(CaptureState::Filling)
            }
        }
    }

    fn fill(&mut self) -> Result<CaptureState> {
        let tail = &self.read_buf[self.frame_start..self.pending.end];
        let taken = self.assembler.begin(tail);
        self.pending = self.frame_start + taken..self.pending.end;

        let frame = self.assembler.fill_from(&mut self.source)?;
        let outcome = self.sink.write_frame(frame.as_ref())?;

        self.summary.bytes_written = outcome.written;
        if outcome.truncated {
            self.summary.truncated_final_frame = true;
        } else {
            self.summary.frames_written += 1;
        }

        if outcome.cap_reached {
            return Ok(self.finish(StopReason::CapReached));
        }
        Ok(CaptureState::Searching)
    }

    fn finish(&mut self, reason: StopReason) -> CaptureState {
        self.summary.stop_reason = Some(reason);
        CaptureState::Done
    }

    /// Current state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Totals so far.
    pub fn summary(&self) -> CaptureSummary {
        self.summary
    }

    /// Borrow the byte source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Borrow the bounded sink.
    pub fn sink(&self) -> &BoundedSink<W> {
        &self.sink
    }

    /// Consume the loop and return the source and the inner output.
    pub fn into_parts(self) -> (S, W) {
        (self.source, self.sink.into_inner())
    }
}
