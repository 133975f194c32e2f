//! Newline-delimited frame codec.
//!
//! Wire format:
//! ```text
//! ┌──────────────────────────┬────┐
//! │ JSON object (N bytes)    │ \n │
//! └──────────────────────────┴────┘
//! ```
//!
//! The codec accumulates incoming bytes and yields complete lines.  This
//! handles partial reads: one `Transport::read` may return part of a
//! line, or several lines back to back.  A trailing `\r` is stripped and
//! empty lines are skipped.
//!
//! A line longer than the configured limit yields one
//! [`FrameError::Overflow`]; the rest of that line is discarded up to the
//! next delimiter.

use crate::error::FrameError;

const DELIMITER: u8 = b'\n';

/// Streaming line decoder.
pub struct LineDecoder {
    buf: Vec<u8>,
    max_len: usize,
    /// Dropping bytes of an overflowed line until the next delimiter.
    discarding: bool,
}

impl LineDecoder {
    pub fn new(max_len: usize) -> Self {
        Self {
            buf: Vec::with_capacity(max_len.min(1024)),
            max_len,
            discarding: false,
        }
    }

    /// Feed bytes into the decoder.
    ///
    /// `on_frame` is called once per complete line (without delimiter) and
    /// once per overflow, in stream order.  Frames borrowed by the callback
    /// are valid only for that call.
    pub fn feed(&mut self, data: &[u8], mut on_frame: impl FnMut(Result<&[u8], FrameError>)) {
        for &byte in data {
            if byte == DELIMITER {
                if self.discarding {
                    self.discarding = false;
                } else {
                    let mut end = self.buf.len();
                    if end > 0 && self.buf[end - 1] == b'\r' {
                        end -= 1;
                    }
                    if end > 0 {
                        on_frame(Ok(&self.buf[..end]));
                    }
                }
                self.buf.clear();
                continue;
            }

            if self.discarding {
                continue;
            }

            if self.buf.len() >= self.max_len {
                self.buf.clear();
                self.discarding = true;
                on_frame(Err(FrameError::Overflow {
                    limit: self.max_len,
                }));
                continue;
            }

            self.buf.push(byte);
        }
    }

    /// Bytes of the current, unterminated line.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}
