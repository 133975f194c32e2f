//! Vehicle signal catalogue.
//!
//! Every signal the app reads or writes, addressed by its VSS path.  The
//! lumbar support signal is a single scalar that carries several air-cell
//! command codes, not a physical level.

use core::fmt;

/// A named vehicle data point reachable through the
/// [`SignalPort`](crate::app::ports::SignalPort).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Vehicle speed (read / subscribe only).
    Speed,
    /// Driver seat fore/aft position.
    SeatPosition,
    /// Left mirror pan axis.
    MirrorPan,
    /// Left mirror tilt axis.
    MirrorTilt,
    /// Driver-side HVAC fan speed.
    FanSpeed,
    /// Driver seat lumbar air-cell command.
    LumbarSupport,
}

impl Signal {
    /// All signals, in catalogue order.
    pub const ALL: [Signal; 6] = [
        Signal::Speed,
        Signal::SeatPosition,
        Signal::MirrorPan,
        Signal::MirrorTilt,
        Signal::FanSpeed,
        Signal::LumbarSupport,
    ];

    /// Full VSS path.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Speed => "Vehicle.Speed",
            Self::SeatPosition => "Vehicle.Cabin.Seat.Row1.Pos1.Position",
            Self::MirrorPan => "Vehicle.Body.Mirrors.Left.Pan",
            Self::MirrorTilt => "Vehicle.Body.Mirrors.Left.Tilt",
            Self::FanSpeed => "Vehicle.Cabin.HVAC.Station.Row1.Left.FanSpeed",
            Self::LumbarSupport => "Vehicle.Cabin.Seat.Row1.Pos1.Backrest.Lumbar.Support",
        }
    }

    /// Reverse lookup from a VSS path.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.path() == path)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One write request issued to the signal port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalWrite {
    pub signal: Signal,
    pub value: i32,
}

impl SignalWrite {
    pub const fn new(signal: Signal, value: i32) -> Self {
        Self { signal, value }
    }
}
