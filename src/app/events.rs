//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) publishes these through
//! the [`MessageBusPort`](super::ports::MessageBusPort).  Each event knows
//! its topic and its JSON payload, so the wire shapes live in one place.

use serde_json::{Map, Value, json};

use crate::config::Topics;

/// `status` value of a response to a successful query.
pub const STATUS_OK: u8 = 0;
/// `status` value of a voice-command response (always a refusal).
pub const STATUS_REJECTED: u8 = 1;

/// Heartbeat payload key.  The companion dashboard matches on it verbatim.
pub const HEARTBEAT_KEY: &str = "...period tasks ...";

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Response to a voice command that could not be carried out.
    VoiceResponse { status: u8, message: String },

    /// Answer to a speed query.
    SpeedQueryResponse { speed: f64 },

    /// Relay of a subscribed speed update.
    SpeedUpdate { speed: f64 },

    /// Echo of a decoded mobile-app frame (compact JSON text).
    BtCmdEcho { frame: String },

    /// Liveness counter.
    Heartbeat { count: u64 },
}

impl AppEvent {
    pub fn topic<'a>(&self, topics: &'a Topics) -> &'a str {
        match self {
            Self::VoiceResponse { .. } => &topics.voice_response,
            Self::SpeedQueryResponse { .. } => &topics.get_speed_response,
            Self::SpeedUpdate { .. } => &topics.current_speed,
            Self::BtCmdEcho { .. } => &topics.bt_cmd_response,
            Self::Heartbeat { .. } => &topics.heartbeat,
        }
    }

    pub fn payload(&self) -> String {
        match self {
            Self::VoiceResponse { status, message } => result_envelope(*status, message),
            Self::SpeedQueryResponse { speed } => {
                result_envelope(STATUS_OK, &format!("Current Speed = {}", format_speed(*speed)))
            }
            Self::SpeedUpdate { speed } => json!({ "speed": speed }).to_string(),
            Self::BtCmdEcho { frame } => json!({ "bt_cmd": frame }).to_string(),
            Self::Heartbeat { count } => {
                let mut body = Map::new();
                body.insert(HEARTBEAT_KEY.to_owned(), Value::from(*count));
                Value::Object(body).to_string()
            }
        }
    }
}

fn result_envelope(status: u8, message: &str) -> String {
    json!({ "result": { "status": status, "message": message } }).to_string()
}

/// Float formatting with at least one decimal (`0.0`, `42.5`), matching
/// what dashboards already parse.
pub fn format_speed(speed: f64) -> String {
    format!("{:?}", speed)
}
