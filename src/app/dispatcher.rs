//! Rule executor with bounded seat tracking.
//!
//! [`Dispatcher`] owns the [`RuleTable`] and the [`SeatTracker`].  It runs
//! a rule's steps in order against a [`SignalPort`], awaiting every write
//! before issuing the next one.
//!
//! A [`Step::Wait`] does not block: the rest of the rule is parked as a
//! pending run with a resume instant, and the caller resumes it through
//! [`resume_due`](Dispatcher::resume_due) once the deadline passes.  Other
//! commands are served in the meantime.  Pending runs are never cancelled,
//! so a stop write still goes out even if a newer command touched the same
//! actuator.
//!
//! ```text
//!  dispatch(rule) ─▶ Write ─▶ Write ─▶ Wait ──┐
//!                                             │ park { rule, cursor, resume_at }
//!  resume_due(now) ◀──────────────────────────┘
//!        └─▶ Write (stop) ─▶ Completed
//! ```

use embassy_time::Instant;
use log::{debug, error, warn};

use crate::app::commands::{AuxCommand, VoiceCommand};
use crate::app::events::{AppEvent, STATUS_REJECTED};
use crate::app::ports::SignalPort;
use crate::app::rules::{Rule, RuleTable, Step};
use crate::app::seat::SeatTracker;
use crate::config::AppConfig;
use crate::signals::{Signal, SignalWrite};

/// How a dispatch (or a resumed run) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    /// Every step ran.
    Completed,
    /// Parked at a wait step until `resume_at`.
    Suspended { resume_at: Instant },
    /// A seat move hit a bound; nothing was written.
    Rejected,
    /// A signal write failed; later steps were dropped.
    Failed,
}

/// Result of one dispatch or resume.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub rule: &'static str,
    /// Acknowledged writes, in issue order.
    pub writes: Vec<SignalWrite>,
    /// Response for the caller to publish.
    pub response: Option<AppEvent>,
    pub status: DispatchStatus,
}

impl DispatchOutcome {
    fn new(rule: &'static str) -> Self {
        Self {
            rule,
            writes: Vec::new(),
            response: None,
            status: DispatchStatus::Completed,
        }
    }
}

/// The remainder of a rule parked behind a wait step.
#[derive(Debug, Clone)]
struct PendingRun {
    rule: Rule,
    cursor: usize,
    resume_at: Instant,
}

pub struct Dispatcher {
    table: RuleTable,
    seat: SeatTracker,
    pending: Vec<PendingRun>,
}

impl Dispatcher {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            table: RuleTable::from_config(config),
            seat: SeatTracker::new(&config.seat),
            pending: Vec::new(),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn seat_position(&self) -> i32 {
        self.seat.position()
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Number of runs parked behind a wait step.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Earliest resume instant among parked runs.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|r| r.resume_at).min()
    }

    // ── Dispatch ──────────────────────────────────────────────

    pub async fn dispatch_voice(
        &mut self,
        cmd: VoiceCommand,
        now: Instant,
        signals: &impl SignalPort,
    ) -> Option<DispatchOutcome> {
        let Some(rule) = self.table.voice(cmd).cloned() else {
            warn!("No rule for voice command {:?}", cmd);
            return None;
        };
        Some(self.dispatch(rule, now, signals).await)
    }

    pub async fn dispatch_aux(
        &mut self,
        cmd: AuxCommand,
        now: Instant,
        signals: &impl SignalPort,
    ) -> Option<DispatchOutcome> {
        let Some(rule) = self.table.aux(cmd) else {
            warn!("No rule for mobile-app command {:?}", cmd);
            return None;
        };
        Some(self.dispatch(rule, now, signals).await)
    }

    /// Run `rule` from its first step.
    pub async fn dispatch(
        &mut self,
        rule: Rule,
        now: Instant,
        signals: &impl SignalPort,
    ) -> DispatchOutcome {
        debug!("Rule '{}' started", rule.name);
        self.execute(rule, 0, now, signals).await
    }

    /// Resume every parked run whose deadline is at or before `now`.
    ///
    /// Runs resume in deadline order; runs sharing a deadline resume in the
    /// order they were parked.
    pub async fn resume_due(
        &mut self,
        now: Instant,
        signals: &impl SignalPort,
    ) -> Vec<DispatchOutcome> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].resume_at <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|run| run.resume_at);

        let mut outcomes = Vec::with_capacity(due.len());
        for run in due {
            debug!("Rule '{}' resumed at step {}", run.rule.name, run.cursor);
            outcomes.push(self.execute(run.rule, run.cursor, now, signals).await);
        }
        outcomes
    }

    // ── Internal ──────────────────────────────────────────────

    async fn execute(
        &mut self,
        rule: Rule,
        start: usize,
        now: Instant,
        signals: &impl SignalPort,
    ) -> DispatchOutcome {
        let name = rule.name;
        let mut outcome = DispatchOutcome::new(name);

        let mut cursor = start;
        while cursor < rule.steps.len() {
            let step = rule.steps[cursor];
            match step {
                Step::Write(write) => {
                    if let Err(e) = signals.set(write.signal, write.value).await {
                        error!("Rule '{}': write {} = {} failed: {}", name, write.signal, write.value, e);
                        outcome.status = DispatchStatus::Failed;
                        return outcome;
                    }
                    debug!("Rule '{}': {} = {}", name, write.signal, write.value);
                    outcome.writes.push(write);
                }

                Step::SeatMove(direction) => match self.seat.propose(direction) {
                    Ok(target) => {
                        if let Err(e) = signals.set(Signal::SeatPosition, target).await {
                            error!("Rule '{}': seat write {} failed: {}", name, target, e);
                            outcome.status = DispatchStatus::Failed;
                            return outcome;
                        }
                        self.seat.commit(target);
                        debug!("The current seat position is {}", target);
                        outcome.writes.push(SignalWrite::new(Signal::SeatPosition, target));
                    }
                    Err(bound) => {
                        let message = self.table.rejection_message(bound).to_owned();
                        debug!("Rule '{}' rejected: {}", name, message);
                        outcome.response = Some(AppEvent::VoiceResponse {
                            status: STATUS_REJECTED,
                            message,
                        });
                        outcome.status = DispatchStatus::Rejected;
                        return outcome;
                    }
                },

                Step::Wait(duration) => {
                    let resume_at = now + duration;
                    self.pending.push(PendingRun {
                        rule,
                        cursor: cursor + 1,
                        resume_at,
                    });
                    outcome.status = DispatchStatus::Suspended { resume_at };
                    return outcome;
                }
            }
            cursor += 1;
        }

        debug!("Rule '{}' completed", name);
        outcome
    }
}
