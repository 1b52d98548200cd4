//! Reminder domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted in the reminder slot.
//! - Validate creation input before a record can exist.
//!
//! # Invariants
//! - `title` is non-empty after trimming.
//! - `radius` is a positive number of meters.
//! - `lat`/`lng` are finite.
//! - `triggered` only flips through `mark_triggered` and `reset_trigger`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a reminder.
///
/// Time-derived (epoch milliseconds) to match the persisted wire format.
pub type ReminderId = i64;

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns whether both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Trigger state derived from the persisted `triggered` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    /// Waiting for the current position to enter the geofence.
    Pending,
    /// Fired once; stays here until an explicit reset.
    Triggered,
}

/// Validation error for reminder creation and persisted record checks.
#[derive(Debug, Clone, PartialEq)]
pub enum ReminderValidationError {
    EmptyTitle,
    MissingLocation,
    InvalidRadius { value: Option<i64> },
    NonFiniteCoordinate { lat: f64, lng: f64 },
}

impl Display for ReminderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "reminder title must not be empty"),
            Self::MissingLocation => {
                write!(f, "select a location on the map or use the current location")
            }
            Self::InvalidRadius { value: Some(value) } => {
                write!(f, "radius must be a positive number of meters, got {value}")
            }
            Self::InvalidRadius { value: None } => {
                write!(f, "radius must be a positive number of meters")
            }
            Self::NonFiniteCoordinate { lat, lng } => {
                write!(f, "coordinates must be finite, got ({lat}, {lng})")
            }
        }
    }
}

impl Error for ReminderValidationError {}

/// Unvalidated creation input collected from a UI shell.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderDraft {
    pub title: String,
    /// `None` when the raw input held no integer at all.
    pub radius: Option<i64>,
    pub location: Option<GeoPoint>,
}

impl ReminderDraft {
    pub fn new(title: impl Into<String>, radius: i64, location: Option<GeoPoint>) -> Self {
        Self {
            title: title.into(),
            radius: Some(radius),
            location,
        }
    }

    /// Builds a draft from raw text fields.
    ///
    /// Radius text is read like a lenient integer parse: leading whitespace and
    /// trailing non-digits are ignored (`"150 m"` -> `150`).
    pub fn from_input(title: &str, radius_text: &str, location: Option<GeoPoint>) -> Self {
        Self {
            title: title.to_string(),
            radius: parse_radius(radius_text),
            location,
        }
    }

    /// Checks the draft and returns normalized fields.
    ///
    /// # Errors
    /// Checked in order: empty title, missing location, invalid radius,
    /// non-finite coordinates.
    pub fn validate(&self) -> Result<(String, u32, GeoPoint), ReminderValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ReminderValidationError::EmptyTitle);
        }
        let location = self
            .location
            .ok_or(ReminderValidationError::MissingLocation)?;
        let radius = validate_radius(self.radius)?;
        if !location.is_finite() {
            return Err(ReminderValidationError::NonFiniteCoordinate {
                lat: location.lat,
                lng: location.lng,
            });
        }
        Ok((title.to_string(), radius, location))
    }
}

/// Persisted reminder record.
///
/// Field order matches the stored JSON object layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReminderRecord")]
pub struct Reminder {
    pub id: ReminderId,
    pub title: String,
    /// Geofence radius in meters.
    pub radius: u32,
    pub lat: f64,
    pub lng: f64,
    pub triggered: bool,
}

impl Reminder {
    /// Creates a pending reminder from a validated draft.
    pub fn from_draft(
        id: ReminderId,
        draft: &ReminderDraft,
    ) -> Result<Self, ReminderValidationError> {
        let (title, radius, location) = draft.validate()?;
        Ok(Self {
            id,
            title,
            radius,
            lat: location.lat,
            lng: location.lng,
            triggered: false,
        })
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    pub fn state(&self) -> ReminderState {
        if self.triggered {
            ReminderState::Triggered
        } else {
            ReminderState::Pending
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state() == ReminderState::Pending
    }

    pub fn mark_triggered(&mut self) {
        self.triggered = true;
    }

    pub fn reset_trigger(&mut self) {
        self.triggered = false;
    }

    /// Re-checks record invariants, used when reading persisted data.
    pub fn validate(&self) -> Result<(), ReminderValidationError> {
        if self.title.trim().is_empty() {
            return Err(ReminderValidationError::EmptyTitle);
        }
        if self.radius == 0 {
            return Err(ReminderValidationError::InvalidRadius { value: Some(0) });
        }
        if !self.location().is_finite() {
            return Err(ReminderValidationError::NonFiniteCoordinate {
                lat: self.lat,
                lng: self.lng,
            });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ReminderRecord {
    id: ReminderId,
    title: String,
    radius: u32,
    lat: f64,
    lng: f64,
    #[serde(default)]
    triggered: bool,
}

impl TryFrom<ReminderRecord> for Reminder {
    type Error = ReminderValidationError;

    fn try_from(record: ReminderRecord) -> Result<Self, Self::Error> {
        let reminder = Self {
            id: record.id,
            title: record.title,
            radius: record.radius,
            lat: record.lat,
            lng: record.lng,
            triggered: record.triggered,
        };
        reminder.validate()?;
        Ok(reminder)
    }
}

/// Parses the leading integer of `text`, ignoring surrounding noise.
///
/// Returns `None` when no digits follow the optional sign.
pub fn parse_radius(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn validate_radius(radius: Option<i64>) -> Result<u32, ReminderValidationError> {
    match radius {
        Some(value) if value > 0 => u32::try_from(value)
            .map_err(|_| ReminderValidationError::InvalidRadius { value: Some(value) }),
        other => Err(ReminderValidationError::InvalidRadius { value: other }),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_radius, validate_radius, ReminderValidationError};

    #[test]
    fn parse_radius_reads_leading_integer() {
        assert_eq!(parse_radius("150"), Some(150));
        assert_eq!(parse_radius("  75 m"), Some(75));
        assert_eq!(parse_radius("12.9"), Some(12));
        assert_eq!(parse_radius("-20"), Some(-20));
    }

    #[test]
    fn parse_radius_rejects_non_numeric_text() {
        assert_eq!(parse_radius(""), None);
        assert_eq!(parse_radius("abc"), None);
        assert_eq!(parse_radius("-"), None);
    }

    #[test]
    fn validate_radius_rejects_out_of_range_values() {
        assert_eq!(
            validate_radius(Some(0)),
            Err(ReminderValidationError::InvalidRadius { value: Some(0) })
        );
        assert!(validate_radius(Some(i64::from(u32::MAX) + 1)).is_err());
        assert_eq!(validate_radius(Some(250)), Ok(250));
    }
}
