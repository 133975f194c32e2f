//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (signal broker, message bus, config storage) implement
//! these traits.  The [`AppService`](super::service::AppService) and the
//! [`Dispatcher`](super::dispatcher::Dispatcher) take them as generic
//! parameters at call sites, so the domain core never touches a socket or
//! a serial device directly.
//!
//! Every broker and bus call is awaited: the dispatcher does not issue the
//! next step of a rule until the previous call has been acknowledged.

use core::fmt;

use crate::config::AppConfig;
use crate::signals::Signal;

// ───────────────────────────────────────────────────────────────
// Signal port (driven adapter: domain ↔ vehicle signal broker)
// ───────────────────────────────────────────────────────────────

/// Read/write/subscribe access to named vehicle signals.
///
/// Subscribed updates are not returned from [`subscribe`](Self::subscribe);
/// the adapter posts them into the application inbox as
/// [`AppInput::SignalUpdate`](super::commands::AppInput::SignalUpdate).
#[allow(async_fn_in_trait)]
pub trait SignalPort {
    /// Read the current value of `signal`.
    async fn get(&self, signal: Signal) -> Result<f64, PortError>;

    /// Write `value` to `signal` and wait for the broker's acknowledgement.
    async fn set(&self, signal: Signal, value: i32) -> Result<(), PortError>;

    /// Start delivering updates of `signal` to the inbox.
    fn subscribe(&self, signal: Signal) -> Result<(), PortError>;
}

// ───────────────────────────────────────────────────────────────
// Message bus port (driven adapter: domain → pub/sub broker)
// ───────────────────────────────────────────────────────────────

/// Outbound half of the message bus.  Inbound messages arrive through the
/// inbox as [`AppInput::BusMessage`](super::commands::AppInput::BusMessage).
#[allow(async_fn_in_trait)]
pub trait MessageBusPort {
    /// Publish a UTF-8 JSON payload on `topic`.
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PortError>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ← persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads application configuration.
///
/// Implementations MUST run [`AppConfig::validate`] before returning a
/// config, and report failures as [`ConfigError::ValidationFailed`] rather
/// than clamping.
pub trait ConfigPort {
    fn load(&self) -> Result<AppConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the inbox)
// ───────────────────────────────────────────────────────────────

/// Callback the [`Scheduler`](crate::scheduler::Scheduler) invokes when a
/// periodic task is due.  The timer task implements this by posting
/// [`AppInput::Periodic`](super::commands::AppInput::Periodic) to the inbox;
/// the scheduler itself knows nothing about channels.
pub trait SchedulerDelegate {
    fn on_task_due(&mut self, task: PeriodicTask);
}

/// Recurring housekeeping jobs driven by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodicTask {
    /// Drain the auxiliary frame queue.
    AuxPoll,
    /// Publish the liveness counter.
    Heartbeat,
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SignalPort`] and [`MessageBusPort`] calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    /// The broker or bus connection is down.
    NotConnected,
    /// The remote side refused the request.
    Rejected(String),
    /// No acknowledgement within the adapter's deadline.
    Timeout,
    /// The signal is not readable/writable through this adapter.
    Unsupported(Signal),
    /// Generic I/O failure from the adapter.
    Io(String),
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No stored configuration.
    NotFound,
    /// Stored configuration failed to deserialize.
    Corrupted(String),
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError(String),
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::Rejected(msg) => write!(f, "rejected: {}", msg),
            Self::Timeout => write!(f, "timed out"),
            Self::Unsupported(signal) => write!(f, "unsupported signal {}", signal),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for PortError {}
impl std::error::Error for ConfigError {}
