//! Line protocol for feeding positions through stdin.
//!
//! Each non-empty line is either `lat,lng` or `error <code>`; `#` starts a comment.

use geofence_core::{LocationError, LocationEvent, Position};

/// Parses one feed line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_feed_line(line: &str) -> Result<Option<LocationEvent>, String> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(code) = line.strip_prefix("error") {
        let code = code
            .trim()
            .parse::<u16>()
            .map_err(|err| format!("invalid error code in `{line}`: {err}"))?;
        return Ok(Some(LocationEvent::Error(LocationError::from_code(code))));
    }

    let (lat, lng) = line
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lng` or `error <code>`, got `{line}`"))?;
    let lat = parse_coordinate(lat, line)?;
    let lng = parse_coordinate(lng, line)?;
    Ok(Some(LocationEvent::Position(Position::new(lat, lng))))
}

fn parse_coordinate(raw: &str, line: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid coordinate in `{line}`: {err}"))?;
    if !value.is_finite() {
        return Err(format!("coordinate must be finite in `{line}`"));
    }
    Ok(value)
}
