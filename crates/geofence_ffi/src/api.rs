//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level reminder functions to Dart via FRB.
//! - Translate core errors into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Store mutations are serialized through one process-wide lock.

use geofence_core::db::open_db;
use geofence_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    GeoPoint, GeofenceConfig, LocationError, Reminder, ReminderDraft, ReminderId, ReminderStore,
    SqliteSlotRepository, StoreResult, Trigger,
};
use log::warn;
use std::sync::{Mutex, OnceLock, PoisonError};

static CONFIG: OnceLock<GeofenceConfig> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling logs.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Reminder row for list rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderItem {
    pub id: i64,
    pub title: String,
    pub radius_m: u32,
    pub lat: f64,
    pub lng: f64,
    pub triggered: bool,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderListResponse {
    pub items: Vec<ReminderItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Generic action response envelope for reminder mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderActionResponse {
    pub ok: bool,
    /// Affected reminder ID, when there is one.
    pub reminder_id: Option<i64>,
    pub message: String,
}

impl ReminderActionResponse {
    fn success(message: impl Into<String>, reminder_id: i64) -> Self {
        Self {
            ok: true,
            reminder_id: Some(reminder_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            reminder_id: None,
            message: message.into(),
        }
    }
}

/// One reminder that fired for a position update.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredItem {
    pub reminder_id: i64,
    pub distance_m: f64,
    /// Ready-to-show alert text.
    pub message: String,
}

/// Position update response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdateResponse {
    pub ok: bool,
    pub triggered: Vec<TriggeredItem>,
    pub message: String,
}

/// Location failure text pair for status line + transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationErrorMessage {
    pub status: String,
    pub message: String,
}

/// Lists all reminders in insertion order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; an unreadable store yields an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn reminders_list() -> ReminderListResponse {
    list_with(resolve_config())
}

/// Creates a reminder from form input.
///
/// `lat`/`lng` are `None` when no location is selected yet.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_create(
    title: String,
    radius_text: String,
    lat: Option<f64>,
    lng: Option<f64>,
) -> ReminderActionResponse {
    create_with(resolve_config(), &title, &radius_text, lat, lng)
}

/// Deletes a reminder. Unknown IDs succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_delete(reminder_id: i64) -> ReminderActionResponse {
    delete_with(resolve_config(), reminder_id)
}

/// Moves a triggered reminder back to pending.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_reset(reminder_id: i64) -> ReminderActionResponse {
    reset_with(resolve_config(), reminder_id)
}

/// Feeds one position from the host's location watch into proximity evaluation.
#[flutter_rust_bridge::frb(sync)]
pub fn position_update(lat: f64, lng: f64) -> PositionUpdateResponse {
    position_update_with(resolve_config(), lat, lng)
}

/// Maps a host geolocation error code to user-facing text.
///
/// `None` means the host has no geolocation facility.
#[flutter_rust_bridge::frb(sync)]
pub fn location_error_message(code: Option<u16>) -> LocationErrorMessage {
    let error = code.map_or(LocationError::Unsupported, LocationError::from_code);
    LocationErrorMessage {
        status: error.status_text().to_string(),
        message: error.user_message().to_string(),
    }
}

fn list_with(config: &GeofenceConfig) -> ReminderListResponse {
    match with_store(config, |store| Ok(store.reminders().to_vec())) {
        Ok(reminders) => {
            let message = if reminders.is_empty() {
                "No saved reminders.".to_string()
            } else {
                format!("{} reminder(s).", reminders.len())
            };
            ReminderListResponse {
                items: reminders.iter().map(to_reminder_item).collect(),
                message,
            }
        }
        Err(err) => ReminderListResponse {
            items: Vec::new(),
            message: format!("reminders_list failed: {err}"),
        },
    }
}

fn create_with(
    config: &GeofenceConfig,
    title: &str,
    radius_text: &str,
    lat: Option<f64>,
    lng: Option<f64>,
) -> ReminderActionResponse {
    let location = lat.zip(lng).map(|(lat, lng)| GeoPoint::new(lat, lng));
    let draft = ReminderDraft::from_input(title, radius_text, location);
    match with_store(config, |store| store.add(&draft)) {
        Ok(reminder) => ReminderActionResponse::success("Reminder saved.", reminder.id),
        Err(err) => ReminderActionResponse::failure(format!("reminder_create failed: {err}")),
    }
}

fn delete_with(config: &GeofenceConfig, reminder_id: ReminderId) -> ReminderActionResponse {
    match with_store(config, |store| store.delete(reminder_id)) {
        Ok(true) => ReminderActionResponse::success("Reminder deleted.", reminder_id),
        Ok(false) => ReminderActionResponse::success("Reminder already absent.", reminder_id),
        Err(err) => ReminderActionResponse::failure(format!("reminder_delete failed: {err}")),
    }
}

fn reset_with(config: &GeofenceConfig, reminder_id: ReminderId) -> ReminderActionResponse {
    match with_store(config, |store| store.reset_trigger(reminder_id)) {
        Ok(true) => ReminderActionResponse::success("Reminder reset.", reminder_id),
        Ok(false) => {
            ReminderActionResponse::success("Reminder already pending or absent.", reminder_id)
        }
        Err(err) => ReminderActionResponse::failure(format!("reminder_reset failed: {err}")),
    }
}

fn position_update_with(config: &GeofenceConfig, lat: f64, lng: f64) -> PositionUpdateResponse {
    let point = GeoPoint::new(lat, lng);
    if !point.is_finite() {
        return PositionUpdateResponse {
            ok: false,
            triggered: Vec::new(),
            message: "position_update failed: coordinates must be finite".to_string(),
        };
    }

    match with_store(config, |store| store.apply_position(point)) {
        Ok(triggers) => PositionUpdateResponse {
            ok: true,
            message: format!("{} reminder(s) triggered.", triggers.len()),
            triggered: triggers.iter().map(to_triggered_item).collect(),
        },
        Err(err) => PositionUpdateResponse {
            ok: false,
            triggered: Vec::new(),
            message: format!("position_update failed: {err}"),
        },
    }
}

fn resolve_config() -> &'static GeofenceConfig {
    CONFIG.get_or_init(GeofenceConfig::from_env)
}

fn with_store<T>(
    config: &GeofenceConfig,
    f: impl FnOnce(&mut ReminderStore<SqliteSlotRepository<'_>>) -> StoreResult<T>,
) -> Result<T, String> {
    let _guard = STORE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db(&config.db_path).map_err(|err| {
        warn!("event=ffi_store module=ffi status=error error_code=db_open_failed error={err}");
        format!("reminder DB open failed: {err}")
    })?;
    let repo = SqliteSlotRepository::try_new(&conn)
        .map_err(|err| format!("reminder repo init failed: {err}"))?;
    let mut store = ReminderStore::open_with_key(repo, config.slot_key.as_str());
    f(&mut store).map_err(|err| err.to_string())
}

fn to_reminder_item(reminder: &Reminder) -> ReminderItem {
    ReminderItem {
        id: reminder.id,
        title: reminder.title.clone(),
        radius_m: reminder.radius,
        lat: reminder.lat,
        lng: reminder.lng,
        triggered: reminder.triggered,
    }
}

fn to_triggered_item(trigger: &Trigger) -> TriggeredItem {
    TriggeredItem {
        reminder_id: trigger.reminder.id,
        distance_m: trigger.distance_m,
        message: trigger.message(),
    }
}
