//! Haversine great-circle distance.
//!
//! # Invariants
//! - `distance(a, b) == distance(b, a)`.
//! - `distance(a, a) == 0.0`.
//! - Finite input always yields a finite, non-negative result.

use crate::model::reminder::GeoPoint;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Returns the great-circle distance in meters between two degree coordinates.
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lng2 - lng1).to_radians();

    let half_chord = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push the chord term slightly outside [0, 1] near antipodes.
    let half_chord = half_chord.clamp(0.0, 1.0);
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());

    EARTH_RADIUS_M * angle
}

/// Point-based convenience wrapper over [`distance`].
pub fn distance_between(a: GeoPoint, b: GeoPoint) -> f64 {
    distance(a.lat, a.lng, b.lat, b.lng)
}

#[cfg(test)]
mod tests {
    use super::{distance, EARTH_RADIUS_M};

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(distance(14.6349, -90.5069, 14.6349, -90.5069), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let meters = distance(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert!((meters - expected).abs() < 1e-6, "got {meters}");
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let meters = distance(0.0, 0.0, 0.0, 180.0);
        assert!(meters.is_finite());
        assert!((meters - EARTH_RADIUS_M * std::f64::consts::PI).abs() < 1.0);
    }
}
