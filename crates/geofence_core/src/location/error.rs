//! Location failure kinds reported by a location source.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Host error code for a denied location permission.
pub const CODE_PERMISSION_DENIED: u16 = 1;
/// Host error code for an unavailable position fix.
pub const CODE_POSITION_UNAVAILABLE: u16 = 2;
/// Host error code for a position request timeout.
pub const CODE_TIMEOUT: u16 = 3;

/// Error propagated from the location collaborator.
///
/// Never mutates reminder state; it only prevents evaluation for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    /// The host has no geolocation facility at all.
    Unsupported,
    Unknown { code: u16 },
}

impl LocationError {
    /// Maps a host geolocation error code to an error kind.
    pub fn from_code(code: u16) -> Self {
        match code {
            CODE_PERMISSION_DENIED => Self::PermissionDenied,
            CODE_POSITION_UNAVAILABLE => Self::PositionUnavailable,
            CODE_TIMEOUT => Self::Timeout,
            other => Self::Unknown { code: other },
        }
    }

    /// Host error code, if this kind has one.
    pub fn code(self) -> Option<u16> {
        match self {
            Self::PermissionDenied => Some(CODE_PERMISSION_DENIED),
            Self::PositionUnavailable => Some(CODE_POSITION_UNAVAILABLE),
            Self::Timeout => Some(CODE_TIMEOUT),
            Self::Unsupported => None,
            Self::Unknown { code } => Some(code),
        }
    }

    /// Short status line for a location indicator.
    pub fn status_text(self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location permission denied.",
            Self::PositionUnavailable => "Position unavailable.",
            Self::Timeout => "Location request timed out.",
            Self::Unsupported => "Geolocation is not supported on this device.",
            Self::Unknown { .. } => "Unknown location error.",
        }
    }

    /// Longer guidance shown in a transient message.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::PermissionDenied => "Allow location access to use location reminders.",
            Self::PositionUnavailable => {
                "Could not get the location (no signal or location service disabled)."
            }
            Self::Timeout => {
                "The location took too long to respond. Try again, enable GPS, or pick a point on the map."
            }
            Self::Unsupported => "Geolocation not supported.",
            Self::Unknown { .. } => "Unknown location error.",
        }
    }
}

impl Display for LocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{} (code {code})", self.status_text()),
            None => write!(f, "{}", self.status_text()),
        }
    }
}

impl Error for LocationError {}
