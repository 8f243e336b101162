//! Sea level pressure
//!
//! Reproduces wrf-python's `slp` (its `DCOMPUTESEAPRS` routine): temperature
//! and height are interpolated to the level `PCONST` above the surface, a
//! standard lapse rate carries them down to the surface and to sea level, and
//! the hypsometric equation is applied between the lowest model level and sea
//! level.
//!
//! Two details differ from the textbook RIP reduction and are kept so results
//! agree with wrf-python: the log-pressure interpolation weight is the product
//! `ln(p_at_pconst / p_hi) * ln(p_lo / p_hi)`, and the MM5 sea level
//! temperature test replaces every column that is not warm at sea level with
//! a cool surface by `TC - 0.005 (T_surf - TC)^2`, cold columns included.

use crate::errors::{Result, WrfError};
use log::warn;
use ndarray::{s, Array3, ArrayView1, ArrayView4, Zip};
use std::sync::atomic::{AtomicUsize, Ordering};

const R: f64 = 287.04;
const G: f64 = 9.81;
const GAMMA: f64 = 0.0065;
/// Distance above the surface where the reduction starts, Pa
const PCONST: f64 = 10_000.0;
/// Upper limit for sea level temperature in warm columns, K
const TC: f64 = 273.16 + 17.5;

/// Sea level pressure (hPa) for a single model column.
///
/// Inputs are ordered from the lowest level upwards: full pressure (Pa),
/// temperature (K), water vapour mixing ratio (kg kg-1) and height on mass
/// levels (m). Returns `None` when the column never reaches `PCONST` above
/// the surface below its top level.
pub fn column_sea_level_pressure(
    pressure: ArrayView1<f32>,
    temperature: ArrayView1<f32>,
    qvapor: ArrayView1<f32>,
    height: ArrayView1<f32>,
) -> Option<f32> {
    let nz = pressure.len();
    if nz < 2 {
        return None;
    }

    let p_sfc = f64::from(pressure[0]);
    let p_at_pconst = p_sfc - PCONST;

    let level = (0..nz).find(|&k| f64::from(pressure[k]) < p_at_pconst)?;
    let klo = level.saturating_sub(1);
    // the top level is never used as the upper bracket
    let khi = (klo + 1).min(nz - 2);
    if klo == khi {
        return None;
    }

    let virtual_temp = |k: usize| {
        f64::from(temperature[k]) * (1.0 + 0.608 * f64::from(qvapor[k]).max(0.0))
    };

    let plo = f64::from(pressure[klo]);
    let phi = f64::from(pressure[khi]);
    let tlo = virtual_temp(klo);
    let thi = virtual_temp(khi);
    let zlo = f64::from(height[klo]);
    let zhi = f64::from(height[khi]);

    let weight = (p_at_pconst / phi).ln() * (plo / phi).ln();
    let t_at_pconst = thi - (thi - tlo) * weight;
    let z_at_pconst = zhi - (zhi - zlo) * weight;

    let t_surf = t_at_pconst * (p_sfc / p_at_pconst).powf(GAMMA * R / G);
    let t_sea_level = t_at_pconst + GAMMA * z_at_pconst;

    let t_sea_level = if t_sea_level >= TC && t_surf <= TC {
        TC
    } else {
        TC - 0.005 * (t_surf - TC).powi(2)
    };

    let z_sfc = f64::from(height[0]);
    let slp = p_sfc * (2.0 * G * z_sfc / (R * (t_sea_level + t_surf))).exp();

    #[allow(clippy::cast_possible_truncation)]
    Some((slp * 0.01) as f32)
}

/// Sea level pressure (hPa) for `(Time, bottom_top, south_north, west_east)`
/// fields, computed column by column on the rayon pool.
///
/// Columns that never rise `PCONST` above the surface are set to NaN.
pub fn sea_level_pressure(
    pressure: ArrayView4<f32>,
    temperature: ArrayView4<f32>,
    qvapor: ArrayView4<f32>,
    height: ArrayView4<f32>,
) -> Result<Array3<f32>> {
    let dim = pressure.dim();
    for (name, other) in [
        ("temperature", temperature.dim()),
        ("water vapour", qvapor.dim()),
        ("height", height.dim()),
    ] {
        if other != dim {
            return Err(WrfError::ShapeMismatch {
                message: format!("{} has shape {:?}, pressure has {:?}", name, other, dim),
            });
        }
    }

    let (nt, _, ny, nx) = dim;
    let mut out = Array3::<f32>::zeros((nt, ny, nx));
    let failed = AtomicUsize::new(0);

    Zip::indexed(&mut out).par_for_each(|(t, j, i), value| {
        *value = column_sea_level_pressure(
            pressure.slice(s![t, .., j, i]),
            temperature.slice(s![t, .., j, i]),
            qvapor.slice(s![t, .., j, i]),
            height.slice(s![t, .., j, i]),
        )
        .unwrap_or_else(|| {
            failed.fetch_add(1, Ordering::Relaxed);
            f32::NAN
        });
    });

    let failed = failed.into_inner();
    if failed > 0 {
        warn!(
            "{} column(s) never reach {} hPa above the surface, sea level pressure set to NaN",
            failed,
            PCONST / 100.0
        );
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, Array4};

    #[test]
    fn surface_at_sea_level_keeps_surface_pressure() {
        let p = arr1(&[100_000.0f32, 85_000.0, 70_000.0]);
        let t = arr1(&[288.0f32, 280.0, 270.0]);
        let q = arr1(&[0.0f32, 0.0, 0.0]);
        let z = arr1(&[0.0f32, 1400.0, 3000.0]);

        let slp = column_sea_level_pressure(p.view(), t.view(), q.view(), z.view()).unwrap();
        assert_relative_eq!(slp, 1000.0, epsilon = 1e-3);
    }

    #[test]
    fn elevated_surface_raises_pressure() {
        let p = arr1(&[90_000.0f32, 78_000.0, 65_000.0]);
        let t = arr1(&[283.0f32, 276.0, 266.0]);
        let q = arr1(&[0.005f32, 0.003, 0.001]);
        let z = arr1(&[1000.0f32, 2100.0, 3500.0]);

        let slp = column_sea_level_pressure(p.view(), t.view(), q.view(), z.view()).unwrap();
        assert!(slp > 1000.0 && slp < 1050.0, "unexpected slp {slp}");
    }

    #[test]
    fn cold_column_uses_mm5_sea_level_temperature() {
        let p = arr1(&[100_000.0f32, 85_000.0, 70_000.0]);
        let t = arr1(&[250.0f32, 250.0, 250.0]);
        let q = arr1(&[0.0f32, 0.0, 0.0]);
        let z = arr1(&[500.0f32, 1900.0, 3500.0]);

        // lapse-rate sea level temperature would be 262.27 K and give 1068.29 hPa
        let slp = column_sea_level_pressure(p.view(), t.view(), q.view(), z.view()).unwrap();
        assert_relative_eq!(slp, 1065.412, epsilon = 1e-2);
    }

    #[test]
    fn shallow_column_has_no_value() {
        let p = arr1(&[100_000.0f32, 95_000.0]);
        let t = arr1(&[288.0f32, 285.0]);
        let q = arr1(&[0.0f32, 0.0]);
        let z = arr1(&[0.0f32, 400.0]);

        assert!(column_sea_level_pressure(p.view(), t.view(), q.view(), z.view()).is_none());

        // only the top level lies PCONST above the surface
        let p = arr1(&[100_000.0f32, 95_000.0, 85_000.0]);
        let t = arr1(&[288.0f32, 285.0, 280.0]);
        let q = arr1(&[0.0f32, 0.0, 0.0]);
        let z = arr1(&[0.0f32, 400.0, 1300.0]);

        assert!(column_sea_level_pressure(p.view(), t.view(), q.view(), z.view()).is_none());
    }

    #[test]
    fn grid_matches_column_computation() {
        let column_p = [100_000.0f32, 85_000.0, 70_000.0];
        let p = Array4::from_shape_fn((2, 3, 2, 2), |(_, k, _, _)| column_p[k]);
        let t = Array4::from_elem((2, 3, 2, 2), 280.0f32);
        let q = Array4::zeros((2, 3, 2, 2));
        let z = Array4::from_shape_fn((2, 3, 2, 2), |(_, k, _, _)| 1500.0 * k as f32);

        let slp = sea_level_pressure(p.view(), t.view(), q.view(), z.view()).unwrap();
        assert_eq!(slp.dim(), (2, 2, 2));
        for value in slp.iter() {
            assert_relative_eq!(*value, 1000.0, epsilon = 1e-3);
        }

        let bad_t = Array4::from_elem((1, 3, 2, 2), 280.0f32);
        assert!(sea_level_pressure(p.view(), bad_t.view(), q.view(), z.view()).is_err());
    }
}
