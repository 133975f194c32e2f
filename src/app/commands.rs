//! Inbound commands to the application service.
//!
//! Everything the outside world can ask of the app arrives as an
//! [`AppInput`] on the inbox.  Bus payloads are decoded here into one of two
//! vocabularies: the fixed [`VoiceCommand`] set, and the free-form
//! mobile-app frame, which decodes per category into [`AuxCommand`]s.

use serde_json::{Map, Value};

use crate::app::ports::PeriodicTask;
use crate::config::AppConfig;
use crate::error::DecodeError;
use crate::signals::Signal;

/// One unit of work for the service task.
#[derive(Debug, Clone, PartialEq)]
pub enum AppInput {
    /// A message received on a subscribed bus topic.
    BusMessage { topic: String, payload: Vec<u8> },
    /// A subscribed signal changed value.
    SignalUpdate { signal: Signal, value: f64 },
    /// A scheduler job is due.
    Periodic(PeriodicTask),
}

impl AppInput {
    pub fn bus(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self::BusMessage {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Voice vocabulary
// ───────────────────────────────────────────────────────────────

/// Spoken commands relayed by the voice MCU, by wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VoiceCommand {
    SeatForward = 0,
    SeatBackward = 1,
    FanStart = 2,
    FanStop = 3,
    MirrorPanLeft = 4,
    MirrorPanRight = 5,
    MirrorTiltUp = 6,
    MirrorTiltDown = 7,
    LumbarInflate = 8,
    LumbarDeflate = 9,
}

impl VoiceCommand {
    pub const ALL: [VoiceCommand; 10] = [
        VoiceCommand::SeatForward,
        VoiceCommand::SeatBackward,
        VoiceCommand::FanStart,
        VoiceCommand::FanStop,
        VoiceCommand::MirrorPanLeft,
        VoiceCommand::MirrorPanRight,
        VoiceCommand::MirrorTiltUp,
        VoiceCommand::MirrorTiltDown,
        VoiceCommand::LumbarInflate,
        VoiceCommand::LumbarDeflate,
    ];

    pub fn from_code(code: i64) -> Result<Self, DecodeError> {
        Self::ALL
            .into_iter()
            .find(|c| *c as i64 == code)
            .ok_or(DecodeError::UnknownVoiceCommand(code))
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Decode a `{"voice_cmd": <int>}` payload.
pub fn decode_voice(payload: &[u8]) -> Result<VoiceCommand, DecodeError> {
    let object = parse_object(payload)?;
    let code = int_field(&object, "voice_cmd")?.ok_or(DecodeError::MissingField("voice_cmd"))?;
    VoiceCommand::from_code(code)
}

// ───────────────────────────────────────────────────────────────
// Mobile-app vocabulary
// ───────────────────────────────────────────────────────────────

/// Independent command categories of a mobile-app frame, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxCategory {
    SeatPosition,
    SeatCalibration,
    MirrorCalibration,
    AirCell,
    Fan,
}

impl AuxCategory {
    pub const ALL: [AuxCategory; 5] = [
        AuxCategory::SeatPosition,
        AuxCategory::SeatCalibration,
        AuxCategory::MirrorCalibration,
        AuxCategory::AirCell,
        AuxCategory::Fan,
    ];

    /// JSON key that selects this category.
    pub const fn key(self) -> &'static str {
        match self {
            Self::SeatPosition => "seatPos",
            Self::SeatCalibration => "seatCali",
            Self::MirrorCalibration => "mirrorCali",
            Self::AirCell => "aircell",
            Self::Fan => "fan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeatDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorMove {
    PanLeft,
    PanRight,
    TiltUp,
    TiltDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirCell {
    Cell0,
    Cell1,
    Stop,
    Deflate,
}

/// A decoded mobile-app command.  `active` carries the frame's `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxCommand {
    SeatPosition(i32),
    SeatCalibration { direction: SeatDirection, active: bool },
    MirrorCalibration { movement: MirrorMove, active: bool },
    AirCell { cell: AirCell, active: bool },
    Fan(i32),
}

/// A category that was present in the frame but failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryError {
    pub category: AuxCategory,
    pub error: DecodeError,
}

/// A decoded mobile-app frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AuxFrame {
    /// The frame as received, for echoing back.
    pub object: Map<String, Value>,
    /// One entry per category present, in [`AuxCategory::ALL`] order.
    pub commands: Vec<Result<AuxCommand, CategoryError>>,
}

/// Decode a mobile-app frame.
///
/// Only a frame that is not a JSON object fails as a whole.  Each category
/// decodes on its own; a bad `fan` value does not stop `mirrorCali` from
/// being applied.
pub fn decode_aux_frame(bytes: &[u8], config: &AppConfig) -> Result<AuxFrame, DecodeError> {
    let object = parse_object(bytes)?;
    let commands = AuxCategory::ALL
        .into_iter()
        .filter(|category| object.contains_key(category.key()))
        .map(|category| {
            decode_category(&object, category, config)
                .map_err(|error| CategoryError { category, error })
        })
        .collect();
    Ok(AuxFrame { object, commands })
}

fn decode_category(
    object: &Map<String, Value>,
    category: AuxCategory,
    config: &AppConfig,
) -> Result<AuxCommand, DecodeError> {
    let key = category.key();
    let raw = int_field(object, key)?.ok_or(DecodeError::MissingField(key))?;

    match category {
        AuxCategory::SeatPosition => {
            let value = ranged(key, raw, config.seat.passthrough_min, config.seat.passthrough_max)?;
            Ok(AuxCommand::SeatPosition(value))
        }
        AuxCategory::SeatCalibration => {
            let direction = match raw {
                0 => SeatDirection::Forward,
                1 => SeatDirection::Backward,
                other => return Err(DecodeError::OutOfRange { field: key, value: other }),
            };
            let active = bool_field(object, "status")?.ok_or(DecodeError::MissingField("status"))?;
            Ok(AuxCommand::SeatCalibration { direction, active })
        }
        AuxCategory::MirrorCalibration => {
            let movement = match raw {
                0 => MirrorMove::PanLeft,
                1 => MirrorMove::PanRight,
                2 => MirrorMove::TiltUp,
                3 => MirrorMove::TiltDown,
                other => return Err(DecodeError::OutOfRange { field: key, value: other }),
            };
            let active = bool_field(object, "status")?.ok_or(DecodeError::MissingField("status"))?;
            Ok(AuxCommand::MirrorCalibration { movement, active })
        }
        AuxCategory::AirCell => {
            let cell = match raw {
                0 => AirCell::Cell0,
                1 => AirCell::Cell1,
                2 => AirCell::Stop,
                3 => AirCell::Deflate,
                other => return Err(DecodeError::OutOfRange { field: key, value: other }),
            };
            let active = bool_field(object, "status")?.unwrap_or(true);
            Ok(AuxCommand::AirCell { cell, active })
        }
        AuxCategory::Fan => {
            let level = ranged(key, raw, 0, config.fan.max_level)?;
            Ok(AuxCommand::Fan(level))
        }
    }
}

// ── JSON helpers ──────────────────────────────────────────────

fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, DecodeError> {
    let text = core::str::from_utf8(bytes).map_err(|_| DecodeError::Utf8)?;
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::NotAnObject),
    }
}

/// Integer value of a JSON number.  Floats with no fractional part
/// (`2.0`) count as integers; senders do not distinguish the two.
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        let f = value.as_f64()?;
        (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
    })
}

/// `Ok(None)` when the key is absent or `null`.
fn int_field(object: &Map<String, Value>, key: &'static str) -> Result<Option<i64>, DecodeError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => as_integer(v).map(Some).ok_or(DecodeError::WrongType(key)),
    }
}

/// Accepts JSON booleans and the integers 0/1.
fn bool_field(object: &Map<String, Value>, key: &'static str) -> Result<Option<bool>, DecodeError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(v) => match as_integer(v) {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(DecodeError::WrongType(key)),
        },
    }
}

fn ranged(field: &'static str, value: i64, min: i32, max: i32) -> Result<i32, DecodeError> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(DecodeError::OutOfRange { field, value });
    }
    Ok(value as i32)
}
