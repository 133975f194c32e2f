//! Integration tests for the auxiliary link: transport bytes → line
//! decoder → frame queue → AppService poll.

use std::collections::VecDeque;

use embassy_time::Instant;
use futures_lite::future::block_on;

use vehicle_skeleton::app::service::AppService;
use vehicle_skeleton::config::AppConfig;
use vehicle_skeleton::link::channels::{AUX_QUEUE_DEPTH, AuxFrameChannel};
use vehicle_skeleton::link::io_task::AuxReader;
use vehicle_skeleton::link::transport::Transport;
use vehicle_skeleton::signals::Signal;

use crate::mock_ports::{MockBus, MockSignals};

/// Serves scripted chunks, one per read, then reports the link closed.
struct ScriptedSerial {
    chunks: VecDeque<Vec<u8>>,
}

impl ScriptedSerial {
    fn new(chunks: &[&[u8]]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
        }
    }
}

impl Transport for ScriptedSerial {
    type Error = String;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, String> {
        let chunk = self.chunks.pop_front().ok_or_else(|| "link closed".to_owned())?;
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}

fn poll(app: &mut AppService, aux: &AuxFrameChannel, signals: &MockSignals, bus: &MockBus) -> usize {
    block_on(app.poll_aux(aux, Instant::from_secs(1), signals, bus))
}

#[test]
fn split_frames_reach_the_dispatcher() {
    let aux = AuxFrameChannel::new();
    let reader = AuxReader::new(
        ScriptedSerial::new(&[
            &b"{\"seatCali\":0,"[..],
            &b"\"status\":true}\r\n{\"fan\""[..],
            &b":55}\n"[..],
        ]),
        1024,
    );
    reader.run(&aux);

    let mut app = AppService::new(AppConfig::default());
    let (signals, bus) = (MockSignals::new(), MockBus::new());
    assert_eq!(poll(&mut app, &aux, &signals, &bus), 2);
    assert_eq!(
        signals.written(),
        vec![(Signal::SeatPosition, 128), (Signal::FanSpeed, 55)]
    );
    assert_eq!(bus.on("sampleapp/bt_cmd/reponse").len(), 2);
}

#[test]
fn oversized_line_is_dropped_and_link_recovers() {
    let aux = AuxFrameChannel::new();
    let long = format!("{{\"fan\":{}}}\n", "1".repeat(64));
    let reader = AuxReader::new(
        ScriptedSerial::new(&[long.as_bytes(), &b"{\"fan\":5}\n"[..]]),
        32,
    );
    reader.run(&aux);

    let mut app = AppService::new(AppConfig::default());
    let (signals, bus) = (MockSignals::new(), MockBus::new());
    assert_eq!(poll(&mut app, &aux, &signals, &bus), 1);
    assert_eq!(signals.written(), vec![(Signal::FanSpeed, 5)]);
}

#[test]
fn full_queue_drops_newest_frames() {
    let aux = AuxFrameChannel::new();
    let script: String = (0..AUX_QUEUE_DEPTH + 4).map(|i| format!("{{\"fan\":{}}}\n", i)).collect();
    let reader = AuxReader::new(ScriptedSerial::new(&[script.as_bytes()]), 1024);
    reader.run(&aux);
    assert_eq!(aux.len(), AUX_QUEUE_DEPTH);

    let mut app = AppService::new(AppConfig::default());
    let (signals, bus) = (MockSignals::new(), MockBus::new());
    assert_eq!(poll(&mut app, &aux, &signals, &bus), AUX_QUEUE_DEPTH);
    let levels: Vec<i32> = signals.written().into_iter().map(|(_, v)| v).collect();
    assert_eq!(levels, (0..AUX_QUEUE_DEPTH as i32).collect::<Vec<_>>());
}

#[test]
fn empty_queue_polls_nothing() {
    let aux = AuxFrameChannel::new();
    let mut app = AppService::new(AppConfig::default());
    let (signals, bus) = (MockSignals::new(), MockBus::new());
    assert_eq!(poll(&mut app, &aux, &signals, &bus), 0);
    assert_eq!(bus.count(), 0);
}
