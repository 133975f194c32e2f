//! Application configuration parameters
//!
//! Every tunable the app uses.  The defaults are the values the vehicle
//! integration ships with; a JSON file (see
//! [`FileConfigAdapter`](crate::adapters::config_file::FileConfigAdapter))
//! may override any subset of them.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::link::channels::MAX_FRAME_CAPACITY;

/// Upper bound for every timing field (one hour).
pub const MAX_INTERVAL_MS: u64 = 60 * 60 * 1000;

/// Message-bus topic names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topics {
    pub get_speed_request: String,
    pub get_speed_response: String,
    pub current_speed: String,
    pub voice_request: String,
    pub voice_response: String,
    /// Echo of decoded mobile-app frames.  The spelling matches what the
    /// companion app subscribes to.
    pub bt_cmd_response: String,
    pub heartbeat: String,
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            get_speed_request: "sampleapp/getSpeed".into(),
            get_speed_response: "sampleapp/getSpeed/response".into(),
            current_speed: "sampleapp/currentSpeed".into(),
            voice_request: "tw_mcu/sdvos_voice_ctrl".into(),
            voice_response: "tw_mcu/sdvos_voice_ctrl/response".into(),
            bt_cmd_response: "sampleapp/bt_cmd/reponse".into(),
            heartbeat: "sampleapp/tasks".into(),
        }
    }
}

/// Seat position tracking bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatConfig {
    pub base: i32,
    pub floor: i32,
    pub ceiling: i32,
    pub step: i32,
    /// Lowest value accepted by the direct `seatPos` passthrough.
    pub passthrough_min: i32,
    /// Highest value accepted by the direct `seatPos` passthrough.
    pub passthrough_max: i32,
    /// Calibration drive codes written to the seat position signal.
    pub cali_forward: i32,
    pub cali_backward: i32,
    pub cali_stop: i32,
}

impl Default for SeatConfig {
    fn default() -> Self {
        Self {
            base: 50,
            floor: 40,
            ceiling: 60,
            step: 10,
            passthrough_min: 1,
            passthrough_max: 100,
            cali_forward: 128,
            cali_backward: 129,
            cali_stop: 130,
        }
    }
}

/// HVAC fan levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    pub start_level: i32,
    pub stop_level: i32,
    /// Highest level accepted from the mobile app.
    pub max_level: i32,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            start_level: 45,
            stop_level: 0,
            max_level: 100,
        }
    }
}

/// Mirror drive codes (pan and tilt share the stop code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub pan_left: i32,
    pub pan_right: i32,
    pub tilt_up: i32,
    pub tilt_down: i32,
    pub stop: i32,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            pan_left: 120,
            pan_right: 121,
            tilt_up: 122,
            tilt_down: 123,
            stop: 118,
        }
    }
}

/// Lumbar air-cell command codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LumbarConfig {
    pub aircell0: i32,
    pub aircell1: i32,
    pub stop: i32,
    pub deflation: i32,
}

impl Default for LumbarConfig {
    fn default() -> Self {
        Self {
            aircell0: 124,
            aircell1: 125,
            stop: 126,
            deflation: 127,
        }
    }
}

/// Serial link to the mobile-app relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Disable to run without the auxiliary command source.
    pub enabled: bool,
    pub device: String,
    pub baud_rate: u32,
    /// Longest accepted line, delimiter excluded.
    pub max_frame_len: usize,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            device: "/dev/ttyUSB0".into(),
            baud_rate: 115_200,
            max_frame_len: 1024,
        }
    }
}

/// Core application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub topics: Topics,
    pub seat: SeatConfig,
    pub fan: FanConfig,
    pub mirror: MirrorConfig,
    pub lumbar: LumbarConfig,
    pub serial: SerialConfig,

    // --- Timing ---
    /// Pause between a timed actuation and its stop write (milliseconds)
    pub actuation_wait_ms: u64,
    /// Auxiliary queue poll interval; also the scheduler base tick (milliseconds)
    pub poll_interval_ms: u64,
    /// Heartbeat publish interval (milliseconds)
    pub heartbeat_interval_ms: u64,

    /// Subscribe to vehicle speed at startup and relay every update.
    pub subscribe_speed: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            topics: Topics::default(),
            seat: SeatConfig::default(),
            fan: FanConfig::default(),
            mirror: MirrorConfig::default(),
            lumbar: LumbarConfig::default(),
            serial: SerialConfig::default(),

            actuation_wait_ms: 2000,
            poll_interval_ms: 100,
            heartbeat_interval_ms: 2000,

            subscribe_speed: true,
        }
    }
}

impl AppConfig {
    /// Range-check the configuration.  Invalid values are rejected, not
    /// clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let seat = &self.seat;
        if seat.floor > seat.ceiling {
            return Err(ConfigError::ValidationFailed("seat.floor above seat.ceiling"));
        }
        if seat.base < seat.floor || seat.base > seat.ceiling {
            return Err(ConfigError::ValidationFailed("seat.base outside [floor, ceiling]"));
        }
        let span = i64::from(seat.ceiling) - i64::from(seat.floor);
        if seat.step <= 0 || i64::from(seat.step) > span.max(1) {
            return Err(ConfigError::ValidationFailed(
                "seat.step must be within 1..=(ceiling - floor)",
            ));
        }
        if seat.passthrough_min > seat.passthrough_max {
            return Err(ConfigError::ValidationFailed(
                "seat.passthrough_min above seat.passthrough_max",
            ));
        }
        if self.fan.max_level < 0 {
            return Err(ConfigError::ValidationFailed("fan.max_level negative"));
        }
        if self.poll_interval_ms == 0 || self.heartbeat_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("intervals must be non-zero"));
        }
        if [self.actuation_wait_ms, self.poll_interval_ms, self.heartbeat_interval_ms]
            .into_iter()
            .any(|ms| ms > MAX_INTERVAL_MS)
        {
            return Err(ConfigError::ValidationFailed("intervals must not exceed one hour"));
        }
        if self.heartbeat_interval_ms % self.poll_interval_ms != 0 {
            return Err(ConfigError::ValidationFailed(
                "heartbeat_interval_ms must be a multiple of poll_interval_ms",
            ));
        }
        if self.serial.max_frame_len == 0 || self.serial.max_frame_len > MAX_FRAME_CAPACITY {
            return Err(ConfigError::ValidationFailed(
                "serial.max_frame_len must be within 1..=4096",
            ));
        }
        Ok(())
    }
}
