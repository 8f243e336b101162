//! Thermodynamic formulas shared by the diagnostics
//!
//! All functions work on single values in SI units unless stated otherwise,
//! computing in f64 and leaving the conversion back to f32 to the caller.

/// Gas constant for dry air, J kg-1 K-1
pub const RD: f64 = 287.0;
/// Specific heat of dry air at constant pressure, J kg-1 K-1
pub const CP: f64 = 1004.5;
/// Gravitational acceleration, m s-2
pub const G: f64 = 9.81;
/// Reference pressure for potential temperature, Pa
pub const P0: f64 = 100_000.0;
/// WRF stores perturbation potential temperature about this base, K
pub const T_BASE: f64 = 300.0;
/// Ratio of the gas constants of dry air and water vapour
pub const EPS: f64 = 0.622;

const SVP1: f64 = 0.6112;
const SVP2: f64 = 17.67;
const SVP3: f64 = 29.65;
const SVPT0: f64 = 273.15;

/// Kelvin offset used for Celsius output
pub const CELKEL: f64 = 273.15;

/// Temperature (K) from potential temperature (K) and pressure (Pa).
#[inline]
pub fn temperature_from_theta(theta: f64, pressure: f64) -> f64 {
    theta * (pressure / P0).powf(RD / CP)
}

/// Saturation vapour pressure over water in hPa for a temperature in K.
#[inline]
pub fn saturation_vapor_pressure(temperature: f64) -> f64 {
    10.0 * SVP1 * (SVP2 * (temperature - SVPT0) / (temperature - SVP3)).exp()
}

/// Relative humidity in percent, clamped to [0, 100].
///
/// `qv` is the water vapour mixing ratio (kg kg-1), `pressure` in Pa and
/// `temperature` in K.
#[inline]
pub fn relative_humidity(qv: f64, pressure: f64, temperature: f64) -> f64 {
    let es = saturation_vapor_pressure(temperature);
    let qvs = EPS * es / (0.01 * pressure - (1.0 - EPS) * es);
    100.0 * (qv / qvs).clamp(0.0, 1.0)
}

/// Dew point in degrees Celsius from mixing ratio (kg kg-1) and pressure (Pa).
#[inline]
pub fn dewpoint(qv: f64, pressure: f64) -> f64 {
    let qv = qv.max(0.0);
    // vapour pressure in hPa, floored to keep the log finite
    let vapor_pressure = (qv * pressure * 0.01 / (EPS + qv)).max(0.001);
    let ln_e = vapor_pressure.ln();
    (243.5 * ln_e - 440.8) / (19.48 - ln_e)
}
