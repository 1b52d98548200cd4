//! Flutter-facing bindings for the geofence reminder core.

pub mod api;
