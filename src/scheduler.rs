//! Periodic task scheduler.
//!
//! Counts base ticks and notifies a [`SchedulerDelegate`] when a task is
//! due.  The timer task drives it from an `embassy-time` ticker and uses
//! an [`InboxDelegate`](crate::app::channels::InboxDelegate), so due jobs
//! reach the service task as ordinary inbox messages.
//!
//! ```text
//! ┌───────────────┐  tick   ┌───────────┐  on_task_due  ┌─────────┐
//! │ Ticker 100ms  │────────▶│ Scheduler │──────────────▶│ Delegate│──▶ Inbox
//! └───────────────┘         └───────────┘               └─────────┘
//! ```

use embassy_time::{Duration, Ticker};
use heapless::Vec;
use log::{info, warn};

use crate::app::ports::{PeriodicTask, SchedulerDelegate};
use crate::config::AppConfig;

/// Maximum number of concurrent entries (stack-allocated).
const MAX_ENTRIES: usize = 4;

/// Internal bookkeeping for a live entry.
#[derive(Debug, Clone)]
struct Entry {
    task: PeriodicTask,
    /// Fire every `every_ticks` base ticks.
    every_ticks: u32,
    /// Ticks elapsed since the last fire.
    elapsed_ticks: u32,
}

/// The scheduler engine.
///
/// Decoupled from channels and timers: [`tick`](Self::tick) is a plain
/// counter step, which keeps the firing logic independently testable.
pub struct Scheduler {
    entries: Vec<Entry, MAX_ENTRIES>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// The app's standard schedule: aux poll every base tick, heartbeat
    /// every `heartbeat_interval_ms / poll_interval_ms` ticks.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut sched = Self::new();
        let heartbeat_ticks = (config.heartbeat_interval_ms / config.poll_interval_ms).max(1);
        sched.add(PeriodicTask::AuxPoll, 1);
        sched.add(PeriodicTask::Heartbeat, heartbeat_ticks as u32);
        sched
    }

    /// Add a task.  Returns `false` if the table is full.
    pub fn add(&mut self, task: PeriodicTask, every_ticks: u32) -> bool {
        let entry = Entry {
            task,
            every_ticks: every_ticks.max(1),
            elapsed_ticks: 0,
        };
        if self.entries.push(entry).is_err() {
            warn!("Scheduler: table full, {:?} not added", task);
            return false;
        }
        info!("Scheduler: added {:?} every {} tick(s)", task, every_ticks);
        true
    }

    /// Advance one base tick.  Due tasks are reported in slot order.
    pub fn tick(&mut self, delegate: &mut dyn SchedulerDelegate) {
        for entry in self.entries.iter_mut() {
            entry.elapsed_ticks += 1;
            if entry.elapsed_ticks >= entry.every_ticks {
                entry.elapsed_ticks = 0;
                delegate.on_task_due(entry.task);
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer task body: tick `scheduler` every `base_tick`, forever.
pub async fn run(scheduler: &mut Scheduler, base_tick: Duration, delegate: &mut dyn SchedulerDelegate) {
    let mut ticker = Ticker::every(base_tick);
    loop {
        ticker.next().await;
        scheduler.tick(delegate);
    }
}
