//! Transport abstraction — any byte-oriented channel.
//!
//! Concrete implementations:
//! - UART serial to the Bluetooth relay ([`SerialTransport`])
//!
//! The I/O task is generic over `Transport`, so tests drive it with a
//! scripted byte source and a new link needs no changes to the framing.

use crate::error::TransportError;

/// Inbound byte source.  The relay link is receive-only.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Display;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 if no data arrived within the transport's read timeout.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

#[cfg(feature = "serial")]
pub use serial::SerialTransport;

#[cfg(feature = "serial")]
mod serial {
    use std::io::Read;
    use std::time::Duration;

    use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

    use super::{Transport, TransportError};

    /// Read timeout.  Bounds how long the reader thread blocks per call.
    const READ_TIMEOUT: Duration = Duration::from_millis(50);

    /// Serial transport for the relay UART.
    pub struct SerialTransport {
        port: Box<dyn SerialPort>,
    }

    impl SerialTransport {
        /// Open `path` at `baud_rate`, 8N1, no flow control.
        pub fn open(path: &str, baud_rate: u32) -> Result<Self, TransportError> {
            let port = serialport::new(path, baud_rate)
                .data_bits(DataBits::Eight)
                .parity(Parity::None)
                .stop_bits(StopBits::One)
                .flow_control(FlowControl::None)
                .timeout(READ_TIMEOUT)
                .open()
                .map_err(|e| TransportError::Open {
                    path: path.to_owned(),
                    reason: e.to_string(),
                })?;

            log::info!("Opened serial port: {} at {} baud", path, baud_rate);
            Ok(Self { port })
        }
    }

    impl Transport for SerialTransport {
        type Error = TransportError;

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
            match self.port.read(buf) {
                Ok(n) => Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
                Err(e) => Err(e.into()),
            }
        }
    }
}
