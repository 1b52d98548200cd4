//! Reminder collection with persist-on-write semantics.
//!
//! # Responsibility
//! - Load the reminder collection once from a key-value slot.
//! - Apply create/delete/trigger/reset mutations and persist after each one.
//!
//! # Invariants
//! - Every mutation is written to the slot before it becomes visible in memory;
//!   a failed write leaves the in-memory collection unchanged.
//! - Reminder ids are unique and strictly increasing in insertion order.
//! - Collection order is insertion order.
//! - Unreadable persisted data never fails the caller; it loads as empty.

use crate::model::reminder::{
    GeoPoint, Reminder, ReminderDraft, ReminderId, ReminderValidationError,
};
use crate::proximity::{evaluate_at, Trigger};
use crate::repo::slot_repo::{RepoError, SlotRepository};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Slot key under which the reminder collection is stored.
pub const DEFAULT_SLOT_KEY: &str = "geoRemindersApp";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by store mutations.
#[derive(Debug)]
pub enum StoreError {
    Validation(ReminderValidationError),
    Persistence(RepoError),
    Serialize(serde_json::Error),
    IdSpaceExhausted,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "failed to persist reminders: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize reminders: {err}"),
            Self::IdSpaceExhausted => write!(f, "no reminder id is available"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::IdSpaceExhausted => None,
        }
    }
}

impl From<ReminderValidationError> for StoreError {
    fn from(value: ReminderValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// In-memory reminder collection bound to one persistent slot.
pub struct ReminderStore<R: SlotRepository> {
    repo: R,
    slot_key: String,
    reminders: Vec<Reminder>,
}

impl<R: SlotRepository> ReminderStore<R> {
    /// Creates a store on [`DEFAULT_SLOT_KEY`] and loads its collection.
    pub fn open(repo: R) -> Self {
        Self::open_with_key(repo, DEFAULT_SLOT_KEY)
    }

    /// Creates a store on a custom slot key and loads its collection.
    pub fn open_with_key(repo: R, slot_key: impl Into<String>) -> Self {
        let mut store = Self {
            repo,
            slot_key: slot_key.into(),
            reminders: Vec::new(),
        };
        store.reminders = store.load();
        store
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// Current collection in insertion order.
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn get(&self, id: ReminderId) -> Option<&Reminder> {
        self.reminders.iter().find(|reminder| reminder.id == id)
    }

    /// Reads the persisted collection.
    ///
    /// Absent, unreadable or unparsable slots yield an empty collection.
    /// Individual records that fail validation or repeat an earlier id are skipped.
    pub fn load(&self) -> Vec<Reminder> {
        let raw = match self.repo.read_slot(&self.slot_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    "event=reminders_load module=store status=recovered reason=read_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        let values = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn!(
                    "event=reminders_load module=store status=recovered reason=unparsable error={}",
                    err
                );
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let mut reminders = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<Reminder>(value) {
                Ok(reminder) if seen.insert(reminder.id) => reminders.push(reminder),
                Ok(reminder) => warn!(
                    "event=reminders_load module=store status=skipped index={} reason=duplicate_id reminder_id={}",
                    index, reminder.id
                ),
                Err(err) => warn!(
                    "event=reminders_load module=store status=skipped index={} reason=invalid_record error={}",
                    index, err
                ),
            }
        }

        info!(
            "event=reminders_load module=store status=ok count={}",
            reminders.len()
        );
        reminders
    }

    /// Serializes and writes a full collection, overwriting the slot.
    pub fn save(&self, reminders: &[Reminder]) -> StoreResult<()> {
        let raw = serde_json::to_string(reminders)?;
        self.repo.write_slot(&self.slot_key, &raw)?;
        Ok(())
    }

    /// Validates a draft and appends it as a new pending reminder.
    ///
    /// # Errors
    /// - `StoreError::Validation` for empty title, missing location or bad radius;
    ///   the collection is unchanged.
    /// - `StoreError::Persistence` when the write fails; the collection is unchanged.
    pub fn add(&mut self, draft: &ReminderDraft) -> StoreResult<Reminder> {
        let reminder = Reminder::from_draft(self.next_id()?, draft)?;

        let mut candidate = self.reminders.clone();
        candidate.push(reminder.clone());
        self.commit(candidate)?;

        info!(
            "event=reminder_add module=store status=ok reminder_id={} radius_m={}",
            reminder.id, reminder.radius
        );
        Ok(reminder)
    }

    /// Convenience form of [`ReminderStore::add`] with a known location.
    pub fn add_at(
        &mut self,
        title: &str,
        radius: i64,
        lat: f64,
        lng: f64,
    ) -> StoreResult<Reminder> {
        self.add(&ReminderDraft::new(
            title,
            radius,
            Some(GeoPoint::new(lat, lng)),
        ))
    }

    /// Removes a reminder. Returns `false` without writing when `id` is absent.
    pub fn delete(&mut self, id: ReminderId) -> StoreResult<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let candidate = self
            .reminders
            .iter()
            .filter(|reminder| reminder.id != id)
            .cloned()
            .collect();
        self.commit(candidate)?;
        info!("event=reminder_delete module=store status=ok reminder_id={id}");
        Ok(true)
    }

    /// Moves a reminder back to pending. Returns `false` when `id` is absent.
    pub fn reset_trigger(&mut self, id: ReminderId) -> StoreResult<bool> {
        let changed = self.update(id, Reminder::reset_trigger)?;
        if changed {
            info!("event=reminder_reset module=store status=ok reminder_id={id}");
        }
        Ok(changed)
    }

    /// Marks a reminder triggered. Returns `false` when `id` is absent.
    pub fn mark_triggered(&mut self, id: ReminderId) -> StoreResult<bool> {
        self.update(id, Reminder::mark_triggered)
    }

    /// Runs proximity evaluation for `position` and persists if anything triggered.
    pub fn apply_position(&mut self, position: GeoPoint) -> StoreResult<Vec<Trigger>> {
        let mut candidate = self.reminders.clone();
        let triggers = evaluate_at(position, &mut candidate);
        if triggers.is_empty() {
            return Ok(triggers);
        }
        self.commit(candidate)?;
        info!(
            "event=reminders_evaluate module=store status=triggered count={}",
            triggers.len()
        );
        Ok(triggers)
    }

    fn update(&mut self, id: ReminderId, apply: impl FnOnce(&mut Reminder)) -> StoreResult<bool> {
        let mut candidate = self.reminders.clone();
        let Some(reminder) = candidate.iter_mut().find(|reminder| reminder.id == id) else {
            return Ok(false);
        };
        apply(reminder);
        self.commit(candidate)?;
        Ok(true)
    }

    fn commit(&mut self, candidate: Vec<Reminder>) -> StoreResult<()> {
        if let Err(err) = self.save(&candidate) {
            warn!(
                "event=reminders_save module=store status=error error={}",
                err
            );
            return Err(err);
        }
        self.reminders = candidate;
        Ok(())
    }

    fn next_id(&self) -> StoreResult<ReminderId> {
        let now_ms = epoch_millis();
        match self.reminders.iter().map(|reminder| reminder.id).max() {
            Some(max_id) => max_id
                .checked_add(1)
                .map(|after_max| after_max.max(now_ms))
                .ok_or(StoreError::IdSpaceExhausted),
            None => Ok(now_ms),
        }
    }
}

fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|elapsed| i64::try_from(elapsed.as_millis()).ok())
        .unwrap_or(0)
}
