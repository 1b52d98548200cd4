//! Core domain logic for location-based reminders.
//! This crate is the single source of truth for geofence invariants.

pub mod config;
pub mod db;
pub mod geo;
pub mod location;
pub mod logging;
pub mod model;
pub mod proximity;
pub mod repo;
pub mod service;

pub use config::GeofenceConfig;
pub use geo::{distance, distance_between, EARTH_RADIUS_M};
pub use location::{
    ChannelLocationSource, LocationError, LocationEvent, LocationOptions, LocationSource,
    LocationWatcher, Position, WatchHandle, WatchSubscription,
};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::reminder::{
    parse_radius, GeoPoint, Reminder, ReminderDraft, ReminderId, ReminderState,
    ReminderValidationError,
};
pub use proximity::{evaluate, evaluate_at, Trigger};
pub use repo::slot_repo::{RepoError, RepoResult, SlotRepository, SqliteSlotRepository};
pub use service::reminder_store::{ReminderStore, StoreError, StoreResult, DEFAULT_SLOT_KEY};
pub use service::session::{
    DrainReport, GeofenceSession, NoopObserver, ReminderObserver, SessionError,
    DEFAULT_PREVIEW_RADIUS_M,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
