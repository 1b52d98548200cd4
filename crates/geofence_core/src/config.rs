//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database location, slot key, logging and radius defaults.
//!
//! # Invariants
//! - Resolution never fails; blank or invalid values fall back to defaults.

use crate::logging::default_log_level;
use crate::service::reminder_store::DEFAULT_SLOT_KEY;
use crate::service::session::DEFAULT_PREVIEW_RADIUS_M;
use log::warn;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "GEOFENCE_DB_PATH";
pub const ENV_SLOT_KEY: &str = "GEOFENCE_SLOT_KEY";
pub const ENV_LOG_LEVEL: &str = "GEOFENCE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GEOFENCE_LOG_DIR";
pub const ENV_DEFAULT_RADIUS_M: &str = "GEOFENCE_DEFAULT_RADIUS_M";

const DEFAULT_DB_FILE_NAME: &str = "geofence_reminders.sqlite3";

/// Resolved runtime settings shared by the shells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeofenceConfig {
    pub db_path: PathBuf,
    pub slot_key: String,
    pub log_level: String,
    /// Logging stays disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub default_radius_m: u32,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            default_radius_m: DEFAULT_PREVIEW_RADIUS_M,
        }
    }
}

impl GeofenceConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let default_radius_m = match read(ENV_DEFAULT_RADIUS_M) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => {
                    warn!(
                        "event=config_resolve module=config status=fallback key={} value={}",
                        ENV_DEFAULT_RADIUS_M, raw
                    );
                    defaults.default_radius_m
                }
            },
            None => defaults.default_radius_m,
        };

        Self {
            db_path: read(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            slot_key: read(ENV_SLOT_KEY).unwrap_or(defaults.slot_key),
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            default_radius_m,
        }
    }
}
