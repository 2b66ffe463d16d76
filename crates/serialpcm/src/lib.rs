//! Capture marker-framed 24-bit PCM audio from a serial device.
//!
//! A USB-CDC node streams fixed-size audio frames, each preceded by a run of
//! four `0x7F` marker bytes. serialpcm finds the frame boundaries, reassembles
//! the payloads across reads and writes them to a size-capped output file.
//!
//! # Crate Structure
//!
//! - [`source`] — Byte sources (raw tty ports, recorded dumps)
//! - [`frame`] — Marker-run synchronization, frame assembly, capped output and the capture loop

/// Re-export byte source types.
pub mod source {
    pub use serialpcm_source::*;
}

/// Re-export frame and capture types.
pub mod frame {
    pub use serialpcm_frame::*;
}
