//! Grid-relative wind speed and direction

/// Horizontal wind speed from the two components.
#[inline]
pub fn wind_speed(u: f64, v: f64) -> f64 {
    u.hypot(v)
}

/// Meteorological direction the wind blows from, degrees clockwise from
/// grid north in `[0, 360)`.
#[inline]
pub fn wind_direction(u: f64, v: f64) -> f64 {
    (270.0 - v.atan2(u).to_degrees()).rem_euclid(360.0)
}
