//! Console message-bus adapter.
//!
//! Implements [`MessageBusPort`] by writing each publish to stdout as one
//! `<topic> <payload>` line, and reads inbound messages in the same format
//! from stdin on a dedicated thread.  A real MQTT client would implement
//! the same trait and post into the same inbox.
//!
//! A line whose first word is a signal path (`Vehicle.Speed 42.5`) is a
//! vehicle-side change for the simulated broker rather than a bus message.

use std::io::{self, BufRead, Write};
use std::thread::JoinHandle;

use log::{debug, info, warn};

use super::sim_broker::InjectChannel;
use crate::app::channels::{Inbox, post};
use crate::app::commands::AppInput;
use crate::app::ports::{MessageBusPort, PortError};
use crate::signals::Signal;

/// Adapter that prints every publish to stdout.
pub struct ConsoleBus;

impl ConsoleBus {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBusPort for ConsoleBus {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PortError> {
        info!("PUBLISH | {} | {}", topic, payload);
        let mut out = io::stdout().lock();
        writeln!(out, "{} {}", topic, payload).map_err(|e| PortError::Io(e.to_string()))?;
        out.flush().map_err(|e| PortError::Io(e.to_string()))
    }
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    /// Inbound bus message.
    Bus(AppInput),
    /// New value for a simulated vehicle signal.
    Inject { signal: Signal, value: f64 },
}

/// Parse one console line.
///
/// The topic is the first whitespace-separated word; the rest of the line,
/// trimmed, is the payload (possibly empty).  Blank lines, and signal
/// lines whose value is not a number, yield `None`.
pub fn parse_line(line: &str) -> Option<ConsoleInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (topic, payload) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let payload = payload.trim();

    let Some(signal) = Signal::from_path(topic) else {
        return Some(ConsoleInput::Bus(AppInput::bus(topic, payload)));
    };
    match payload.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(ConsoleInput::Inject { signal, value }),
        _ => {
            warn!("Console: {} needs a numeric value, got '{}'", signal, payload);
            None
        }
    }
}

/// Start the stdin reader thread.  End of input stops the reader only;
/// the app keeps running.
pub fn spawn_stdin_reader(
    inbox: &'static Inbox,
    injections: &'static InjectChannel,
) -> io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("console-stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        info!("Console input failed: {}", e);
                        return;
                    }
                };
                match parse_line(&line) {
                    Some(ConsoleInput::Bus(input)) => {
                        debug!("Console input queued");
                        post(inbox, input);
                    }
                    Some(ConsoleInput::Inject { signal, value }) => {
                        if injections.try_send((signal, value)).is_err() {
                            warn!("Injection queue full, dropping {}", signal);
                        }
                    }
                    None => {}
                }
            }
            info!("Console input closed");
        })
}
