//! Domain model for location-based reminders.
//!
//! # Responsibility
//! - Define the persisted reminder record and its creation-time validation.
//! - Provide the shared coordinate value type.
//!
//! # Invariants
//! - Every reminder is identified by a stable, collection-unique `ReminderId`.
//! - A reminder's radius is positive and never changes after creation.

pub mod reminder;
