//! Pending -> Triggered state transitions driven by position updates.
//!
//! # Invariants
//! - Each reminder is judged independently of others in the same pass.
//! - Returned triggers keep collection order.
//! - The engine does not persist; callers persist only when triggers are non-empty.

use crate::geo::distance;
use crate::model::reminder::{GeoPoint, Reminder};
use log::debug;

/// One reminder that entered its geofence during an evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    /// Snapshot taken right after the transition (`triggered == true`).
    pub reminder: Reminder,
    /// Great-circle distance from the evaluated position, in meters.
    pub distance_m: f64,
}

impl Trigger {
    /// User-facing alert text.
    pub fn message(&self) -> String {
        format!(
            "Nearby reminder: {} (≈ {:.1} m)",
            self.reminder.title, self.distance_m
        )
    }
}

/// Evaluates every pending reminder against the current position.
///
/// Reminders within their radius are marked triggered in place and returned.
pub fn evaluate(current_lat: f64, current_lng: f64, reminders: &mut [Reminder]) -> Vec<Trigger> {
    let mut triggered = Vec::new();

    for reminder in reminders.iter_mut().filter(|reminder| reminder.is_pending()) {
        let distance_m = distance(current_lat, current_lng, reminder.lat, reminder.lng);
        if distance_m <= f64::from(reminder.radius) {
            reminder.mark_triggered();
            debug!(
                "event=reminder_trigger module=proximity status=ok reminder_id={} radius_m={} distance_m={:.1}",
                reminder.id, reminder.radius, distance_m
            );
            triggered.push(Trigger {
                reminder: reminder.clone(),
                distance_m,
            });
        }
    }

    triggered
}

/// Point-based convenience wrapper over [`evaluate`].
pub fn evaluate_at(position: GeoPoint, reminders: &mut [Reminder]) -> Vec<Trigger> {
    evaluate(position.lat, position.lng, reminders)
}
