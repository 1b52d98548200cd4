//! Location source capability and its event types.

use super::error::LocationError;
use crate::model::reminder::GeoPoint;
use std::sync::mpsc::Receiver;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const ONE_SHOT_MAXIMUM_AGE: Duration = Duration::from_secs(1);
const WATCH_MAXIMUM_AGE: Duration = Duration::from_secs(2);

/// One position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub point: GeoPoint,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            point: GeoPoint::new(lat, lng),
        }
    }
}

/// Item delivered by a watch subscription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationEvent {
    Position(Position),
    Error(LocationError),
}

/// Request hints forwarded to the host location facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the host may return.
    pub maximum_age: Duration,
}

impl LocationOptions {
    /// Defaults for a single "use my location" request.
    pub fn one_shot() -> Self {
        Self {
            high_accuracy: true,
            timeout: DEFAULT_TIMEOUT,
            maximum_age: ONE_SHOT_MAXIMUM_AGE,
        }
    }

    /// Defaults for a continuous watch.
    pub fn watch() -> Self {
        Self {
            maximum_age: WATCH_MAXIMUM_AGE,
            ..Self::one_shot()
        }
    }
}

/// Opaque identifier of an active watch subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchHandle(pub u64);

/// Active continuous subscription.
///
/// The receiver disconnects once the handle is cancelled and queued events drain.
#[derive(Debug)]
pub struct WatchSubscription {
    pub handle: WatchHandle,
    pub events: Receiver<LocationEvent>,
}

/// Host capability supplying position data.
pub trait LocationSource {
    /// Requests a single position fix.
    fn current_position(&mut self, options: &LocationOptions) -> Result<Position, LocationError>;

    /// Starts a continuous subscription.
    fn watch(&mut self, options: &LocationOptions) -> Result<WatchSubscription, LocationError>;

    /// Releases a subscription. Unknown handles are ignored.
    fn cancel(&mut self, handle: WatchHandle);
}
