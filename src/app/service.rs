//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the configuration, the [`Dispatcher`] (and with it
//! the seat tracker), and the heartbeat counter.  It routes every
//! [`AppInput`] to its handler and publishes the resulting [`AppEvent`]s.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  Inbox ──▶ ┌────────────────────────┐ ──▶ MessageBusPort
//!            │      AppService        │
//!  AUX ───▶  │ Dispatcher · Seat      │ ◀─▶ SignalPort
//!            └────────────────────────┘
//! ```
//!
//! Exactly one task runs [`AppService::run`], so handlers never interleave.

use embassy_time::{Instant, Timer};
use futures_lite::future;
use log::{debug, error, info, warn};
use serde_json::Value;

use crate::config::AppConfig;
use crate::link::channels::AuxFrameChannel;
use crate::signals::Signal;

use super::channels::Inbox;
use super::commands::{AppInput, decode_aux_frame, decode_voice};
use super::dispatcher::{DispatchOutcome, Dispatcher};
use super::events::AppEvent;
use super::ports::{MessageBusPort, PeriodicTask, SignalPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// What woke the service task.
enum Wake {
    Input(AppInput),
    Deadline,
}

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: AppConfig,
    dispatcher: Dispatcher,
    heartbeat_count: u64,
}

impl AppService {
    pub fn new(config: AppConfig) -> Self {
        let dispatcher = Dispatcher::new(&config);
        Self {
            config,
            dispatcher,
            heartbeat_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Register signal subscriptions.  A failed subscription is logged;
    /// the app keeps serving everything else.
    pub fn start(&self, signals: &impl SignalPort) {
        if self.config.subscribe_speed {
            match signals.subscribe(Signal::Speed) {
                Ok(()) => info!("Subscribed to {}", Signal::Speed),
                Err(e) => error!("Subscribing to {} failed: {}", Signal::Speed, e),
            }
        }
        info!(
            "AppService started, {} rules, seat at {}",
            self.dispatcher.table().len(),
            self.dispatcher.seat_position()
        );
    }

    /// Service task body.  Waits for the next inbox message or the next
    /// pending-run deadline, whichever comes first, and never returns.
    pub async fn run(
        mut self,
        inbox: &Inbox,
        aux: &AuxFrameChannel,
        signals: &impl SignalPort,
        bus: &impl MessageBusPort,
    ) {
        loop {
            let deadline = self.next_due();
            let wake = future::or(async { Wake::Input(inbox.receive().await) }, async {
                match deadline {
                    Some(at) => Timer::at(at).await,
                    None => future::pending::<()>().await,
                }
                Wake::Deadline
            })
            .await;

            if let Wake::Input(input) = wake {
                self.handle(input, Instant::now(), aux, signals, bus).await;
            }
            self.resume_due(Instant::now(), signals, bus).await;
        }
    }

    // ── Input routing ─────────────────────────────────────────

    /// Route one inbox message.
    pub async fn handle(
        &mut self,
        input: AppInput,
        now: Instant,
        aux: &AuxFrameChannel,
        signals: &impl SignalPort,
        bus: &impl MessageBusPort,
    ) {
        match input {
            AppInput::BusMessage { topic, payload } => {
                debug!("Received on {}: {}", topic, String::from_utf8_lossy(&payload));
                if topic == self.config.topics.voice_request {
                    self.on_voice_request(&payload, now, signals, bus).await;
                } else if topic == self.config.topics.get_speed_request {
                    self.on_get_speed_request(signals, bus).await;
                } else {
                    debug!("No handler for topic {}", topic);
                }
            }
            AppInput::SignalUpdate { signal: Signal::Speed, value } => {
                self.on_speed_update(value, bus).await;
            }
            AppInput::SignalUpdate { signal, value } => {
                debug!("Ignoring update {} = {}", signal, value);
            }
            AppInput::Periodic(PeriodicTask::AuxPoll) => {
                self.poll_aux(aux, now, signals, bus).await;
            }
            AppInput::Periodic(PeriodicTask::Heartbeat) => {
                self.heartbeat(bus).await;
            }
        }
    }

    /// Decode a voice request and run its rule.  Returns `None` if the
    /// payload did not decode.
    pub async fn on_voice_request(
        &mut self,
        payload: &[u8],
        now: Instant,
        signals: &impl SignalPort,
        bus: &impl MessageBusPort,
    ) -> Option<DispatchOutcome> {
        let cmd = match decode_voice(payload) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!("Voice request dropped: {}", e);
                return None;
            }
        };
        debug!("Voice command {:?}", cmd);

        let outcome = self.dispatcher.dispatch_voice(cmd, now, signals).await?;
        if let Some(response) = &outcome.response {
            self.publish(response, bus).await;
        }
        Some(outcome)
    }

    /// Answer a speed query with the broker's current value.
    pub async fn on_get_speed_request(&self, signals: &impl SignalPort, bus: &impl MessageBusPort) {
        match signals.get(Signal::Speed).await {
            Ok(speed) => {
                self.publish(&AppEvent::SpeedQueryResponse { speed }, bus)
                    .await
            }
            Err(e) => error!("Reading {} failed: {}", Signal::Speed, e),
        }
    }

    /// Relay a subscribed speed update.
    pub async fn on_speed_update(&self, speed: f64, bus: &impl MessageBusPort) {
        self.publish(&AppEvent::SpeedUpdate { speed }, bus).await;
    }

    /// Decode one mobile-app frame, run each category it carries, then
    /// echo the frame.
    pub async fn on_aux_frame(
        &mut self,
        bytes: &[u8],
        now: Instant,
        signals: &impl SignalPort,
        bus: &impl MessageBusPort,
    ) {
        let frame = match decode_aux_frame(bytes, &self.config) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("AUX frame dropped: {}", e);
                return;
            }
        };

        for command in frame.commands {
            match command {
                Ok(cmd) => {
                    debug!("AUX command {:?}", cmd);
                    let outcome = self.dispatcher.dispatch_aux(cmd, now, signals).await;
                    if let Some(response) = outcome.and_then(|o| o.response) {
                        self.publish(&response, bus).await;
                    }
                }
                Err(e) => warn!("AUX '{}' skipped: {}", e.category.key(), e.error),
            }
        }

        let echo = AppEvent::BtCmdEcho {
            frame: Value::Object(frame.object).to_string(),
        };
        self.publish(&echo, bus).await;
    }

    /// Drain the frames queued at the moment of the call, oldest first.
    /// Frames arriving meanwhile wait for the next poll.  Returns the
    /// number handled.
    pub async fn poll_aux(
        &mut self,
        aux: &AuxFrameChannel,
        now: Instant,
        signals: &impl SignalPort,
        bus: &impl MessageBusPort,
    ) -> usize {
        let queued = aux.len();
        let mut handled = 0;
        for _ in 0..queued {
            let Ok(frame) = aux.try_receive() else { break };
            self.on_aux_frame(&frame, now, signals, bus).await;
            handled += 1;
        }
        handled
    }

    /// Bump the liveness counter and publish it.
    pub async fn heartbeat(&mut self, bus: &impl MessageBusPort) {
        self.heartbeat_count += 1;
        let event = AppEvent::Heartbeat {
            count: self.heartbeat_count,
        };
        self.publish(&event, bus).await;
    }

    /// Resume parked runs that are due.  Returns how many resumed.
    pub async fn resume_due(
        &mut self,
        now: Instant,
        signals: &impl SignalPort,
        bus: &impl MessageBusPort,
    ) -> usize {
        let outcomes = self.dispatcher.resume_due(now, signals).await;
        for outcome in &outcomes {
            if let Some(response) = &outcome.response {
                self.publish(response, bus).await;
            }
        }
        outcomes.len()
    }

    // ── Queries ───────────────────────────────────────────────

    /// Earliest instant at which a parked run becomes due.
    pub fn next_due(&self) -> Option<Instant> {
        self.dispatcher.next_due()
    }

    pub fn seat_position(&self) -> i32 {
        self.dispatcher.seat_position()
    }

    pub fn heartbeat_count(&self) -> u64 {
        self.heartbeat_count
    }

    /// Runs parked behind a wait step.
    pub fn pending_runs(&self) -> usize {
        self.dispatcher.pending()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    async fn publish(&self, event: &AppEvent, bus: &impl MessageBusPort) {
        let topic = event.topic(&self.config.topics);
        if let Err(e) = bus.publish(topic, &event.payload()).await {
            error!("Publish on {} failed: {}", topic, e);
        }
    }
}
