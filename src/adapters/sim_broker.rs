//! Simulated vehicle signal broker.
//!
//! Implements [`SignalPort`] over an in-process value store so the app runs
//! end to end without a data broker.  Writes are acknowledged immediately;
//! subscribed signals post their initial value, and every later
//! [`inject`](SimulatedBroker::inject)ed value, into the inbox.
//!
//! Vehicle-side changes arrive on [`SIM_INJECT`]: the console reader queues
//! `Vehicle.Speed 42.5` style lines there and
//! [`serve_injections`](SimulatedBroker::serve_injections) applies them on
//! the executor thread that owns the broker.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{debug, info};

use crate::app::channels::{Inbox, post};
use crate::app::commands::AppInput;
use crate::app::ports::{PortError, SignalPort};
use crate::signals::Signal;

/// Injection queue depth.  A full queue drops the injection.
pub const INJECT_DEPTH: usize = 8;

pub type InjectChannel = Channel<CriticalSectionRawMutex, (Signal, f64), INJECT_DEPTH>;

/// Console reader → broker task.
pub static SIM_INJECT: InjectChannel = Channel::new();

pub struct SimulatedBroker<'a> {
    values: RefCell<HashMap<Signal, f64>>,
    subscribed: RefCell<HashSet<Signal>>,
    inbox: &'a Inbox,
}

impl<'a> SimulatedBroker<'a> {
    /// Every signal starts at `0.0`.
    pub fn new(inbox: &'a Inbox) -> Self {
        info!("SimulatedBroker: in-process signal store");
        Self {
            values: RefCell::new(Signal::ALL.into_iter().map(|s| (s, 0.0)).collect()),
            subscribed: RefCell::new(HashSet::new()),
            inbox,
        }
    }

    /// Set a value from the vehicle side (e.g. a speed change) and notify
    /// subscribers.
    pub fn inject(&self, signal: Signal, value: f64) {
        self.values.borrow_mut().insert(signal, value);
        if self.subscribed.borrow().contains(&signal) {
            post(self.inbox, AppInput::SignalUpdate { signal, value });
        }
    }

    /// Broker task body: apply queued injections, forever.
    pub async fn serve_injections(&self, channel: &InjectChannel) {
        loop {
            let (signal, value) = channel.receive().await;
            info!("INJECT | {} | {}", signal, value);
            self.inject(signal, value);
        }
    }

    /// Current stored value.
    pub fn value(&self, signal: Signal) -> f64 {
        self.values.borrow().get(&signal).copied().unwrap_or_default()
    }
}

impl SignalPort for SimulatedBroker<'_> {
    async fn get(&self, signal: Signal) -> Result<f64, PortError> {
        Ok(self.value(signal))
    }

    async fn set(&self, signal: Signal, value: i32) -> Result<(), PortError> {
        if signal == Signal::Speed {
            return Err(PortError::Unsupported(signal));
        }
        info!("SET | {} | {}", signal, value);
        self.values.borrow_mut().insert(signal, f64::from(value));
        Ok(())
    }

    fn subscribe(&self, signal: Signal) -> Result<(), PortError> {
        if self.subscribed.borrow_mut().insert(signal) {
            debug!("SimulatedBroker: {} subscribed", signal);
            post(self.inbox, AppInput::SignalUpdate {
                signal,
                value: self.value(signal),
            });
        }
        Ok(())
    }
}
