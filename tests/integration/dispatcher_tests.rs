//! Integration tests for the Dispatcher → RuleTable → SignalPort chain.

use embassy_time::{Duration, Instant};
use futures_lite::future::block_on;

use vehicle_skeleton::app::commands::{AirCell, AuxCommand, MirrorMove, SeatDirection, VoiceCommand};
use vehicle_skeleton::app::dispatcher::{DispatchStatus, Dispatcher};
use vehicle_skeleton::app::events::AppEvent;
use vehicle_skeleton::config::AppConfig;
use vehicle_skeleton::signals::Signal;

use crate::mock_ports::MockSignals;

const WAIT: Duration = Duration::from_millis(2000);

fn t0() -> Instant {
    Instant::from_secs(100)
}

fn make() -> (Dispatcher, MockSignals) {
    (Dispatcher::new(&AppConfig::default()), MockSignals::new())
}

fn voice(d: &mut Dispatcher, s: &MockSignals, cmd: VoiceCommand, now: Instant) -> DispatchStatus {
    block_on(d.dispatch_voice(cmd, now, s)).unwrap().status
}

// ── Seat tracking ─────────────────────────────────────────────

#[test]
fn seat_forward_from_base_writes_ceiling() {
    let (mut d, s) = make();
    assert_eq!(voice(&mut d, &s, VoiceCommand::SeatForward, t0()), DispatchStatus::Completed);
    assert_eq!(s.written(), vec![(Signal::SeatPosition, 60)]);
    assert_eq!(d.seat_position(), 60);
}

#[test]
fn back_to_back_forward_moves_write_once_then_reject() {
    let (mut d, s) = make();
    let first = block_on(d.dispatch_voice(VoiceCommand::SeatForward, t0(), &s)).unwrap();
    let second = block_on(d.dispatch_voice(VoiceCommand::SeatForward, t0(), &s)).unwrap();

    assert_eq!(first.status, DispatchStatus::Completed);
    assert!(first.response.is_none());
    assert_eq!(second.status, DispatchStatus::Rejected);
    assert!(second.writes.is_empty());
    assert_eq!(
        second.response,
        Some(AppEvent::VoiceResponse {
            status: 1,
            message: "The Seat Position will be bigger than max value(60).".into(),
        })
    );
    assert_eq!(s.written(), vec![(Signal::SeatPosition, 60)]);
    assert_eq!(d.seat_position(), 60);
}

#[test]
fn seat_backward_stops_at_floor() {
    let (mut d, s) = make();
    voice(&mut d, &s, VoiceCommand::SeatBackward, t0());
    let outcome = block_on(d.dispatch_voice(VoiceCommand::SeatBackward, t0(), &s)).unwrap();

    assert_eq!(s.written(), vec![(Signal::SeatPosition, 40)]);
    assert_eq!(d.seat_position(), 40);
    assert_eq!(
        outcome.response,
        Some(AppEvent::VoiceResponse {
            status: 1,
            message: "The Seat Position will be less than min value(40).".into(),
        })
    );
}

#[test]
fn failed_seat_write_leaves_tracker_unchanged() {
    let (mut d, s) = make();
    s.fail_writes_of(60);
    assert_eq!(voice(&mut d, &s, VoiceCommand::SeatForward, t0()), DispatchStatus::Failed);
    assert_eq!(d.seat_position(), 50);
    assert!(s.written().is_empty());
}

// ── Simple writes ─────────────────────────────────────────────

#[test]
fn fan_start_and_stop() {
    let (mut d, s) = make();
    voice(&mut d, &s, VoiceCommand::FanStart, t0());
    voice(&mut d, &s, VoiceCommand::FanStop, t0());
    assert_eq!(s.written(), vec![(Signal::FanSpeed, 45), (Signal::FanSpeed, 0)]);
}

// ── Timed actuation ───────────────────────────────────────────

#[test]
fn mirror_pan_writes_stop_only_after_wait() {
    let (mut d, s) = make();
    let status = voice(&mut d, &s, VoiceCommand::MirrorPanLeft, t0());
    assert_eq!(status, DispatchStatus::Suspended { resume_at: t0() + WAIT });
    assert_eq!(s.written(), vec![(Signal::MirrorPan, 120)]);
    assert_eq!(d.pending(), 1);
    assert_eq!(d.next_due(), Some(t0() + WAIT));

    let early = block_on(d.resume_due(t0() + Duration::from_millis(1999), &s));
    assert!(early.is_empty());
    assert_eq!(s.written().len(), 1);

    let due = block_on(d.resume_due(t0() + WAIT, &s));
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].status, DispatchStatus::Completed);
    assert_eq!(s.written(), vec![(Signal::MirrorPan, 120), (Signal::MirrorPan, 118)]);
    assert_eq!(d.pending(), 0);
    assert!(d.next_due().is_none());
}

#[test]
fn mirror_tilt_uses_tilt_axis() {
    let (mut d, s) = make();
    voice(&mut d, &s, VoiceCommand::MirrorTiltDown, t0());
    block_on(d.resume_due(t0() + WAIT, &s));
    assert_eq!(s.written(), vec![(Signal::MirrorTilt, 123), (Signal::MirrorTilt, 118)]);
}

#[test]
fn lumbar_inflate_sequence() {
    let (mut d, s) = make();
    voice(&mut d, &s, VoiceCommand::LumbarInflate, t0());
    assert_eq!(
        s.written(),
        vec![(Signal::LumbarSupport, 124), (Signal::LumbarSupport, 125)]
    );
    block_on(d.resume_due(t0() + WAIT, &s));
    assert_eq!(s.written().last(), Some(&(Signal::LumbarSupport, 126)));
    assert_eq!(s.written().len(), 3);
}

#[test]
fn lumbar_deflate_sequence() {
    let (mut d, s) = make();
    voice(&mut d, &s, VoiceCommand::LumbarDeflate, t0());
    block_on(d.resume_due(t0() + WAIT, &s));
    assert_eq!(
        s.written(),
        vec![(Signal::LumbarSupport, 127), (Signal::LumbarSupport, 126)]
    );
}

#[test]
fn other_commands_run_while_a_rule_waits() {
    let (mut d, s) = make();
    voice(&mut d, &s, VoiceCommand::MirrorPanRight, t0());
    voice(&mut d, &s, VoiceCommand::FanStart, t0() + Duration::from_millis(500));
    voice(&mut d, &s, VoiceCommand::SeatForward, t0() + Duration::from_millis(600));
    block_on(d.resume_due(t0() + WAIT, &s));

    assert_eq!(
        s.written(),
        vec![
            (Signal::MirrorPan, 121),
            (Signal::FanSpeed, 45),
            (Signal::SeatPosition, 60),
            (Signal::MirrorPan, 118),
        ]
    );
}

#[test]
fn runs_sharing_a_deadline_resume_in_park_order() {
    let (mut d, s) = make();
    voice(&mut d, &s, VoiceCommand::LumbarDeflate, t0());
    voice(&mut d, &s, VoiceCommand::MirrorTiltUp, t0());
    s.clear();

    let due = block_on(d.resume_due(t0() + WAIT, &s));
    let names: Vec<_> = due.iter().map(|o| o.rule).collect();
    assert_eq!(names, vec!["lumbar-deflate", "mirror-tilt-up"]);
    assert_eq!(
        s.written(),
        vec![(Signal::LumbarSupport, 126), (Signal::MirrorTilt, 118)]
    );
}

#[test]
fn earlier_deadline_resumes_first() {
    let (mut d, s) = make();
    voice(&mut d, &s, VoiceCommand::MirrorPanLeft, t0() + Duration::from_millis(300));
    voice(&mut d, &s, VoiceCommand::LumbarDeflate, t0());
    s.clear();

    block_on(d.resume_due(t0() + Duration::from_secs(5), &s));
    assert_eq!(
        s.written(),
        vec![(Signal::LumbarSupport, 126), (Signal::MirrorPan, 118)]
    );
}

#[test]
fn failed_write_ends_rule_without_parking() {
    let (mut d, s) = make();
    s.fail_writes_of(125);
    let outcome = block_on(d.dispatch_voice(VoiceCommand::LumbarInflate, t0(), &s)).unwrap();
    assert_eq!(outcome.status, DispatchStatus::Failed);
    assert_eq!(outcome.writes.len(), 1);
    assert_eq!(s.written(), vec![(Signal::LumbarSupport, 124)]);
    assert_eq!(d.pending(), 0);
}

// ── Mobile-app commands ───────────────────────────────────────

#[test]
fn aux_calibration_rules() {
    let (mut d, s) = make();
    let cmds = [
        AuxCommand::SeatCalibration { direction: SeatDirection::Forward, active: true },
        AuxCommand::SeatCalibration { direction: SeatDirection::Backward, active: false },
        AuxCommand::MirrorCalibration { movement: MirrorMove::TiltUp, active: true },
        AuxCommand::MirrorCalibration { movement: MirrorMove::PanRight, active: false },
        AuxCommand::AirCell { cell: AirCell::Cell1, active: true },
        AuxCommand::AirCell { cell: AirCell::Deflate, active: false },
    ];
    for cmd in cmds {
        let outcome = block_on(d.dispatch_aux(cmd, t0(), &s)).unwrap();
        assert_eq!(outcome.status, DispatchStatus::Completed);
    }
    assert_eq!(
        s.written(),
        vec![
            (Signal::SeatPosition, 128),
            (Signal::SeatPosition, 130),
            (Signal::MirrorTilt, 122),
            (Signal::MirrorPan, 118),
            (Signal::LumbarSupport, 125),
            (Signal::LumbarSupport, 126),
        ]
    );
}

#[test]
fn aux_passthrough_writes_value_and_leaves_tracker() {
    let (mut d, s) = make();
    block_on(d.dispatch_aux(AuxCommand::SeatPosition(75), t0(), &s));
    block_on(d.dispatch_aux(AuxCommand::Fan(70), t0(), &s));
    assert_eq!(s.written(), vec![(Signal::SeatPosition, 75), (Signal::FanSpeed, 70)]);
    assert_eq!(d.seat_position(), 50);
}
