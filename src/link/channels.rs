//! Auxiliary frame queue.
//!
//! Uses an `embassy-sync` bounded channel to bridge the blocking serial
//! reader thread with the service task.  The reader pushes complete lines;
//! the service drains the backlog once per poll tick.
//!
//! ```text
//! ┌──────────────┐  AuxFrame   ┌──────────────┐
//! │ Serial thread│────────────▶│ Service task │
//! │ (blocking)   │ try_send    │ (poll 100ms) │
//! └──────────────┘             └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use log::warn;

/// Largest frame the queue can carry.  `serial.max_frame_len` may not
/// exceed it.
pub const MAX_FRAME_CAPACITY: usize = 4096;

/// Queue depth.  A full queue drops new frames.
pub const AUX_QUEUE_DEPTH: usize = 16;

/// One newline-delimited frame, delimiter stripped.
pub type AuxFrame = Vec<u8, MAX_FRAME_CAPACITY>;

pub type AuxFrameChannel = Channel<CriticalSectionRawMutex, AuxFrame, AUX_QUEUE_DEPTH>;

/// Serial thread → service task.
pub static AUX_FRAMES: AuxFrameChannel = Channel::new();

/// Copy `frame` into the queue.  Returns `false` if it was dropped.
pub fn enqueue_frame(channel: &AuxFrameChannel, frame: &[u8]) -> bool {
    let mut buf = AuxFrame::new();
    if buf.extend_from_slice(frame).is_err() {
        warn!("AUX: frame of {} bytes exceeds queue capacity", frame.len());
        return false;
    }
    if channel.try_send(buf).is_err() {
        warn!("AUX: frame queue full, dropping frame");
        return false;
    }
    true
}
