//! Geofence proximity evaluation.
//!
//! # Responsibility
//! - Move pending reminders to triggered when a position enters their radius.
//!
//! # Invariants
//! - Triggered reminders are never re-evaluated until explicitly reset.
//! - The boundary is inclusive: `distance <= radius` triggers.

pub mod engine;

pub use engine::{evaluate, evaluate_at, Trigger};
