//! Declarative command → signal rule table.
//!
//! Each command key maps to one [`Rule`]: an ordered list of [`Step`]s.
//! The [`Dispatcher`](super::dispatcher::Dispatcher) executes steps in
//! order and knows nothing about individual commands.  Adding a command
//! means adding a table entry.
//!
//! ```text
//!  VoiceCommand ─┐
//!                ├─▶ RuleKey ──▶ RuleTable ──▶ Rule { [Write, Wait, Write] }
//!  AuxCommand ───┘
//! ```

use std::collections::HashMap;

use embassy_time::Duration;

use crate::app::commands::{AirCell, AuxCommand, MirrorMove, SeatDirection, VoiceCommand};
use crate::app::seat::SeatBound;
use crate::config::AppConfig;
use crate::signals::{Signal, SignalWrite};

/// One step of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Write a fixed value.
    Write(SignalWrite),
    /// Bound-checked move of the tracked seat position.  On a bound
    /// violation the rule ends with a rejection response and no write.
    SeatMove(SeatDirection),
    /// Suspend the rule; other commands keep running meanwhile.
    Wait(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub steps: Vec<Step>,
}

impl Rule {
    fn new(name: &'static str, steps: Vec<Step>) -> Self {
        Self { name, steps }
    }
}

/// Table key for every rule with a fixed step list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKey {
    Voice(VoiceCommand),
    SeatCalibration { direction: SeatDirection, active: bool },
    MirrorCalibration { movement: MirrorMove, active: bool },
    AirCell { cell: AirCell, active: bool },
}

pub struct RuleTable {
    rules: HashMap<RuleKey, Rule>,
    ceiling_message: String,
    floor_message: String,
}

fn write(signal: Signal, value: i32) -> Step {
    Step::Write(SignalWrite::new(signal, value))
}

impl RuleTable {
    pub fn from_config(config: &AppConfig) -> Self {
        let wait = Step::Wait(Duration::from_millis(config.actuation_wait_ms));
        let m = &config.mirror;
        let l = &config.lumbar;
        let f = &config.fan;
        let s = &config.seat;

        let mut rules = HashMap::new();
        let mut add = |key: RuleKey, rule: Rule| {
            rules.insert(key, rule);
        };

        // ── Voice vocabulary ──────────────────────────────────
        use VoiceCommand as V;
        add(
            RuleKey::Voice(V::SeatForward),
            Rule::new("seat-forward", vec![Step::SeatMove(SeatDirection::Forward)]),
        );
        add(
            RuleKey::Voice(V::SeatBackward),
            Rule::new("seat-backward", vec![Step::SeatMove(SeatDirection::Backward)]),
        );
        add(
            RuleKey::Voice(V::FanStart),
            Rule::new("fan-start", vec![write(Signal::FanSpeed, f.start_level)]),
        );
        add(
            RuleKey::Voice(V::FanStop),
            Rule::new("fan-stop", vec![write(Signal::FanSpeed, f.stop_level)]),
        );
        for (cmd, name, signal, value) in [
            (V::MirrorPanLeft, "mirror-pan-left", Signal::MirrorPan, m.pan_left),
            (V::MirrorPanRight, "mirror-pan-right", Signal::MirrorPan, m.pan_right),
            (V::MirrorTiltUp, "mirror-tilt-up", Signal::MirrorTilt, m.tilt_up),
            (V::MirrorTiltDown, "mirror-tilt-down", Signal::MirrorTilt, m.tilt_down),
        ] {
            add(
                RuleKey::Voice(cmd),
                Rule::new(name, vec![write(signal, value), wait, write(signal, m.stop)]),
            );
        }
        add(
            RuleKey::Voice(V::LumbarInflate),
            Rule::new(
                "lumbar-inflate",
                vec![
                    write(Signal::LumbarSupport, l.aircell0),
                    write(Signal::LumbarSupport, l.aircell1),
                    wait,
                    write(Signal::LumbarSupport, l.stop),
                ],
            ),
        );
        add(
            RuleKey::Voice(V::LumbarDeflate),
            Rule::new(
                "lumbar-deflate",
                vec![
                    write(Signal::LumbarSupport, l.deflation),
                    wait,
                    write(Signal::LumbarSupport, l.stop),
                ],
            ),
        );

        // ── Mobile-app calibration vocabulary ─────────────────
        for (direction, name, code) in [
            (SeatDirection::Forward, "seat-cali-forward", s.cali_forward),
            (SeatDirection::Backward, "seat-cali-backward", s.cali_backward),
        ] {
            add(
                RuleKey::SeatCalibration { direction, active: true },
                Rule::new(name, vec![write(Signal::SeatPosition, code)]),
            );
            add(
                RuleKey::SeatCalibration { direction, active: false },
                Rule::new("seat-cali-stop", vec![write(Signal::SeatPosition, s.cali_stop)]),
            );
        }
        for (movement, name, signal, value) in [
            (MirrorMove::PanLeft, "mirror-cali-pan-left", Signal::MirrorPan, m.pan_left),
            (MirrorMove::PanRight, "mirror-cali-pan-right", Signal::MirrorPan, m.pan_right),
            (MirrorMove::TiltUp, "mirror-cali-tilt-up", Signal::MirrorTilt, m.tilt_up),
            (MirrorMove::TiltDown, "mirror-cali-tilt-down", Signal::MirrorTilt, m.tilt_down),
        ] {
            add(
                RuleKey::MirrorCalibration { movement, active: true },
                Rule::new(name, vec![write(signal, value)]),
            );
            add(
                RuleKey::MirrorCalibration { movement, active: false },
                Rule::new("mirror-cali-stop", vec![write(signal, m.stop)]),
            );
        }
        for (cell, name, value) in [
            (AirCell::Cell0, "aircell-0", l.aircell0),
            (AirCell::Cell1, "aircell-1", l.aircell1),
            (AirCell::Stop, "aircell-stop", l.stop),
            (AirCell::Deflate, "aircell-deflate", l.deflation),
        ] {
            add(
                RuleKey::AirCell { cell, active: true },
                Rule::new(name, vec![write(Signal::LumbarSupport, value)]),
            );
            add(
                RuleKey::AirCell { cell, active: false },
                Rule::new("aircell-stop", vec![write(Signal::LumbarSupport, l.stop)]),
            );
        }

        Self {
            rules,
            ceiling_message: format!(
                "The Seat Position will be bigger than max value({}).",
                s.ceiling
            ),
            floor_message: format!("The Seat Position will be less than min value({}).", s.floor),
        }
    }

    pub fn get(&self, key: RuleKey) -> Option<&Rule> {
        self.rules.get(&key)
    }

    pub fn voice(&self, cmd: VoiceCommand) -> Option<&Rule> {
        self.get(RuleKey::Voice(cmd))
    }

    /// Resolve a mobile-app command.  Passthrough categories carry their
    /// value in the command, so their one-step rule is built here.
    pub fn aux(&self, cmd: AuxCommand) -> Option<Rule> {
        match cmd {
            AuxCommand::SeatPosition(value) => {
                Some(Rule::new("seat-position", vec![write(Signal::SeatPosition, value)]))
            }
            AuxCommand::Fan(level) => Some(Rule::new("fan-level", vec![write(Signal::FanSpeed, level)])),
            AuxCommand::SeatCalibration { direction, active } => {
                self.get(RuleKey::SeatCalibration { direction, active }).cloned()
            }
            AuxCommand::MirrorCalibration { movement, active } => {
                self.get(RuleKey::MirrorCalibration { movement, active }).cloned()
            }
            AuxCommand::AirCell { cell, active } => {
                self.get(RuleKey::AirCell { cell, active }).cloned()
            }
        }
    }

    /// Response text for a refused seat move.
    pub fn rejection_message(&self, bound: SeatBound) -> &str {
        match bound {
            SeatBound::Ceiling(_) => &self.ceiling_message,
            SeatBound::Floor(_) => &self.floor_message,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
