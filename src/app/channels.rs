//! Application inbox.
//!
//! Every state-affecting input reaches the service task through this one
//! `embassy-sync` channel: bus messages (console/stdin thread), signal
//! updates (broker adapter), and scheduler jobs (timer task).  The service
//! task is the only consumer, so it is the single place that owns and
//! mutates application state.
//!
//! ```text
//! ┌──────────────┐
//! │ Bus adapter  │──┐
//! ├──────────────┤  │  AppInput  ┌──────────────┐
//! │ Broker       │──┼───────────▶│ Service task │
//! ├──────────────┤  │            └──────────────┘
//! │ Timer task   │──┘
//! └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use super::commands::AppInput;
use super::ports::{PeriodicTask, SchedulerDelegate};

/// Inbox depth.  Producers never block; a full inbox drops the input.
pub const INBOX_DEPTH: usize = 32;

pub type Inbox = Channel<CriticalSectionRawMutex, AppInput, INBOX_DEPTH>;

/// Adapters → service task.
pub static INBOX: Inbox = Channel::new();

/// Non-blocking post, safe from any thread.  Returns `false` if the input
/// was dropped.
pub fn post(inbox: &Inbox, input: AppInput) -> bool {
    match inbox.try_send(input) {
        Ok(()) => true,
        Err(_) => {
            warn!("Inbox full, dropping input");
            false
        }
    }
}

/// Scheduler delegate that turns due jobs into inbox messages.
pub struct InboxDelegate<'a> {
    inbox: &'a Inbox,
}

impl<'a> InboxDelegate<'a> {
    pub fn new(inbox: &'a Inbox) -> Self {
        Self { inbox }
    }
}

impl SchedulerDelegate for InboxDelegate<'_> {
    fn on_task_due(&mut self, task: PeriodicTask) {
        post(self.inbox, AppInput::Periodic(task));
    }
}
