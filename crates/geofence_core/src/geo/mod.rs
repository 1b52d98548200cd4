//! Geodesic math for geofence checks.
//!
//! # Responsibility
//! - Compute great-circle distances between degree coordinates.
//!
//! # Invariants
//! - Every function here is pure and never fails on finite input.

pub mod haversine;

pub use haversine::{distance, distance_between, EARTH_RADIUS_M};
