//! Mock port adapters for integration tests.
//!
//! Record every signal write and every publish so tests can assert on the
//! full history without a broker or a bus.

use std::cell::{Cell, RefCell};

use serde_json::Value;
use vehicle_skeleton::app::ports::{MessageBusPort, PortError, SignalPort};
use vehicle_skeleton::signals::{Signal, SignalWrite};

// ── MockSignals ───────────────────────────────────────────────

pub struct MockSignals {
    pub writes: RefCell<Vec<SignalWrite>>,
    pub subscriptions: RefCell<Vec<Signal>>,
    pub speed: Cell<f64>,
    /// Writes of this value are refused.
    fail_value: Cell<Option<i32>>,
    read_fails: Cell<bool>,
}

#[allow(dead_code)]
impl MockSignals {
    pub fn new() -> Self {
        Self {
            writes: RefCell::new(Vec::new()),
            subscriptions: RefCell::new(Vec::new()),
            speed: Cell::new(0.0),
            fail_value: Cell::new(None),
            read_fails: Cell::new(false),
        }
    }

    pub fn fail_writes_of(&self, value: i32) {
        self.fail_value.set(Some(value));
    }

    pub fn fail_reads(&self) {
        self.read_fails.set(true);
    }

    pub fn written(&self) -> Vec<(Signal, i32)> {
        self.writes.borrow().iter().map(|w| (w.signal, w.value)).collect()
    }

    pub fn clear(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl SignalPort for MockSignals {
    async fn get(&self, signal: Signal) -> Result<f64, PortError> {
        if self.read_fails.get() {
            return Err(PortError::NotConnected);
        }
        match signal {
            Signal::Speed => Ok(self.speed.get()),
            other => Err(PortError::Unsupported(other)),
        }
    }

    async fn set(&self, signal: Signal, value: i32) -> Result<(), PortError> {
        if self.fail_value.get() == Some(value) {
            return Err(PortError::Rejected(format!("{} refused", value)));
        }
        self.writes.borrow_mut().push(SignalWrite::new(signal, value));
        Ok(())
    }

    fn subscribe(&self, signal: Signal) -> Result<(), PortError> {
        self.subscriptions.borrow_mut().push(signal);
        Ok(())
    }
}

// ── MockBus ───────────────────────────────────────────────────

pub struct MockBus {
    pub published: RefCell<Vec<(String, String)>>,
    fails: Cell<bool>,
}

#[allow(dead_code)]
impl MockBus {
    pub fn new() -> Self {
        Self {
            published: RefCell::new(Vec::new()),
            fails: Cell::new(false),
        }
    }

    pub fn fail_publishes(&self) {
        self.fails.set(true);
    }

    /// Parsed payloads published on `topic`, in order.
    pub fn on(&self, topic: &str) -> Vec<Value> {
        self.published
            .borrow()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| serde_json::from_str(p).unwrap())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.published.borrow().len()
    }
}

impl MessageBusPort for MockBus {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PortError> {
        if self.fails.get() {
            return Err(PortError::NotConnected);
        }
        self.published
            .borrow_mut()
            .push((topic.to_owned(), payload.to_owned()));
        Ok(())
    }
}
