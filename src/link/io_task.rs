//! Auxiliary link reader — blocking transport bridge.
//!
//! Runs in a dedicated thread.  Each iteration blocks on one
//! `Transport::read` (bounded by the transport's read timeout), feeds the
//! bytes through the [`LineDecoder`], and pushes complete lines into the
//! frame queue.  The service task drains that queue on its own poll tick,
//! so nothing here touches application state.
//!
//! ```text
//!  ┌─────────────────────────────────────────────────┐
//!  │  aux-serial thread                              │
//!  │  Transport::read ─▶ LineDecoder ─▶ AUX_FRAMES   │
//!  └─────────────────────────────────────────────────┘
//! ```
//!
//! A read error ends the thread; the link stays down for the rest of the
//! process.

use log::{error, info, warn};

use super::channels::{AuxFrameChannel, enqueue_frame};
use super::codec::LineDecoder;
use super::transport::Transport;

const READ_BUF_SIZE: usize = 256;

/// Transport + framing state for one link.
pub struct AuxReader<T: Transport> {
    transport: T,
    decoder: LineDecoder,
    read_buf: [u8; READ_BUF_SIZE],
}

impl<T: Transport> AuxReader<T> {
    pub fn new(transport: T, max_frame_len: usize) -> Self {
        Self {
            transport,
            decoder: LineDecoder::new(max_frame_len),
            read_buf: [0; READ_BUF_SIZE],
        }
    }

    /// Perform one read and enqueue any completed frames.
    /// Returns the number of frames enqueued.
    pub fn pump(&mut self, channel: &AuxFrameChannel) -> Result<usize, T::Error> {
        let n = self.transport.read(&mut self.read_buf)?;
        let mut enqueued = 0;
        self.decoder.feed(&self.read_buf[..n], |frame| match frame {
            Ok(line) => {
                if enqueue_frame(channel, line) {
                    enqueued += 1;
                }
            }
            Err(e) => warn!("AUX: dropped frame: {}", e),
        });
        Ok(enqueued)
    }

    /// Pump until the transport fails.
    pub fn run(mut self, channel: &AuxFrameChannel) {
        info!("AUX reader started");
        loop {
            if let Err(e) = self.pump(channel) {
                error!("AUX: transport read failed, link disabled: {}", e);
                return;
            }
        }
    }
}

/// Open the serial device and start the reader thread.
///
/// On error the caller logs and runs without the auxiliary link.
#[cfg(feature = "serial")]
pub fn spawn(
    config: &crate::config::SerialConfig,
    channel: &'static AuxFrameChannel,
) -> Result<std::thread::JoinHandle<()>, crate::error::TransportError> {
    let transport = super::transport::SerialTransport::open(&config.device, config.baud_rate)?;
    let reader = AuxReader::new(transport, config.max_frame_len);
    let handle = std::thread::Builder::new()
        .name("aux-serial".into())
        .spawn(move || reader.run(channel))
        .map_err(crate::error::TransportError::Io)?;
    Ok(handle)
}
