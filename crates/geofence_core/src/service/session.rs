//! Reminder session orchestrating store, selection and location events.
//!
//! # Responsibility
//! - Hold the reminder store and the transient selected location for one shell.
//! - Turn location events into proximity evaluation and observer notifications.
//!
//! # Invariants
//! - Location errors never touch reminder state.
//! - Observers hear about list changes only after the change is persisted.
//! - Evaluations that trigger nothing cause no write and no notification.

use crate::location::{
    LocationError, LocationEvent, LocationOptions, LocationSource, LocationWatcher, Position,
};
use crate::model::reminder::{GeoPoint, Reminder, ReminderDraft, ReminderId};
use crate::proximity::Trigger;
use crate::repo::slot_repo::SlotRepository;
use crate::service::reminder_store::{ReminderStore, StoreError, StoreResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Radius used to preview a selection when the typed radius is unusable.
pub const DEFAULT_PREVIEW_RADIUS_M: u32 = 100;

/// Presentation callbacks emitted by the session.
pub trait ReminderObserver {
    fn on_reminder_list_changed(&mut self, _reminders: &[Reminder]) {}
    fn on_reminder_triggered(&mut self, _reminder: &Reminder, _distance_m: f64) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ReminderObserver for NoopObserver {}

/// Error returned while handling a location event.
#[derive(Debug)]
pub enum SessionError {
    Location(LocationError),
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Location(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Location(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<LocationError> for SessionError {
    fn from(value: LocationError) -> Self {
        Self::Location(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Outcome of draining queued watch events.
#[derive(Debug, Default)]
pub struct DrainReport {
    pub positions: usize,
    pub triggers: Vec<Trigger>,
    pub errors: Vec<LocationError>,
}

/// Explicit owner of reminder state for one UI shell.
pub struct GeofenceSession<R: SlotRepository, O: ReminderObserver = NoopObserver> {
    store: ReminderStore<R>,
    observer: O,
    selected: Option<GeoPoint>,
    last_position: Option<Position>,
    default_radius_m: u32,
}

impl<R: SlotRepository, O: ReminderObserver> GeofenceSession<R, O> {
    pub fn new(store: ReminderStore<R>, observer: O) -> Self {
        Self {
            store,
            observer,
            selected: None,
            last_position: None,
            default_radius_m: DEFAULT_PREVIEW_RADIUS_M,
        }
    }

    /// Overrides the preview radius fallback. Zero is ignored.
    pub fn with_default_radius(mut self, radius_m: u32) -> Self {
        if radius_m > 0 {
            self.default_radius_m = radius_m;
        }
        self
    }

    pub fn reminders(&self) -> &[Reminder] {
        self.store.reminders()
    }

    pub fn store(&self) -> &ReminderStore<R> {
        &self.store
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn selected_location(&self) -> Option<GeoPoint> {
        self.selected
    }

    pub fn last_position(&self) -> Option<Position> {
        self.last_position
    }

    /// Records a location picked on the map.
    pub fn select_location(&mut self, point: GeoPoint) {
        self.selected = Some(point);
    }

    /// Requests a one-shot fix and makes it the selected location.
    ///
    /// # Errors
    /// Returns the source error; selection and reminders are unchanged.
    pub fn capture_current_location<S: LocationSource>(
        &mut self,
        source: &mut S,
    ) -> Result<Position, LocationError> {
        match source.current_position(&LocationOptions::one_shot()) {
            Ok(position) => {
                self.last_position = Some(position);
                self.selected = Some(position.point);
                Ok(position)
            }
            Err(err) => {
                warn!(
                    "event=location_capture module=session status=error error={}",
                    err
                );
                Err(err)
            }
        }
    }

    /// Radius for drawing the selection circle from raw radius text.
    pub fn preview_radius(&self, radius_text: &str) -> u32 {
        crate::model::reminder::parse_radius(radius_text)
            .and_then(|value| u32::try_from(value).ok())
            .filter(|value| *value > 0)
            .unwrap_or(self.default_radius_m)
    }

    /// Creates a reminder at the selected location from raw form input.
    pub fn save_reminder(&mut self, title: &str, radius_text: &str) -> StoreResult<Reminder> {
        let draft = ReminderDraft::from_input(title, radius_text, self.selected);
        let reminder = self.store.add(&draft)?;
        self.notify_list_changed();
        Ok(reminder)
    }

    pub fn delete_reminder(&mut self, id: ReminderId) -> StoreResult<bool> {
        let removed = self.store.delete(id)?;
        if removed {
            self.notify_list_changed();
        }
        Ok(removed)
    }

    pub fn reset_reminder(&mut self, id: ReminderId) -> StoreResult<bool> {
        let reset = self.store.reset_trigger(id)?;
        if reset {
            self.notify_list_changed();
        }
        Ok(reset)
    }

    /// Processes one location event.
    ///
    /// # Errors
    /// - `SessionError::Location` for error events; nothing is evaluated.
    /// - `SessionError::Store` when persisting triggers fails.
    pub fn handle_location_event(
        &mut self,
        event: LocationEvent,
    ) -> Result<Vec<Trigger>, SessionError> {
        let position = match event {
            LocationEvent::Position(position) => position,
            LocationEvent::Error(err) => {
                warn!(
                    "event=location_update module=session status=error error={}",
                    err
                );
                return Err(err.into());
            }
        };

        self.last_position = Some(position);
        let triggers = self.store.apply_position(position.point)?;
        if !triggers.is_empty() {
            for trigger in &triggers {
                self.observer
                    .on_reminder_triggered(&trigger.reminder, trigger.distance_m);
            }
            self.notify_list_changed();
        }
        Ok(triggers)
    }

    /// Handles every event currently queued on the watcher, in arrival order.
    ///
    /// Location errors are collected; a persistence failure stops the drain.
    pub fn drain<S: LocationSource>(
        &mut self,
        watcher: &mut LocationWatcher<S>,
    ) -> StoreResult<DrainReport> {
        let mut report = DrainReport::default();
        while let Some(event) = watcher.try_next() {
            match self.handle_location_event(event) {
                Ok(mut triggers) => {
                    report.positions += 1;
                    report.triggers.append(&mut triggers);
                }
                Err(SessionError::Location(err)) => report.errors.push(err),
                Err(SessionError::Store(err)) => return Err(err),
            }
        }
        if !report.triggers.is_empty() {
            info!(
                "event=location_drain module=session status=ok positions={} triggers={}",
                report.positions,
                report.triggers.len()
            );
        }
        Ok(report)
    }

    fn notify_list_changed(&mut self) {
        self.observer
            .on_reminder_list_changed(self.store.reminders());
    }
}
