//! Synthetic WRF output used by the integration tests
//!
//! Grid: 3 mass levels, 2 x 2 horizontal points, hourly times starting at
//! 2024-03-01_00:00:00. Fields vary with the global hour `g` so that the
//! order of concatenated files can be checked.

#![allow(dead_code)]

use ndarray::{Array2, Array3, Array4};
use netcdf::types::NcVariableType;
use netcdf::{create, NcTypeDescriptor};
use std::path::{Path, PathBuf};

pub const NZ: usize = 3;
pub const NY: usize = 2;
pub const NX: usize = 2;

/// Full pressure per mass level, Pa (P is zero)
pub const PB_LEVELS: [f32; NZ] = [100_000.0, 85_000.0, 70_000.0];
/// Perturbation potential temperature per level at hour 0
pub const T_LEVELS: [f32; NZ] = [-12.0, -5.0, 5.0];
/// Geopotential height of the staggered levels, m
pub const Z_STAG: [f32; NZ + 1] = [0.0, 1400.0, 3000.0, 4800.0];
pub const QVAPOR: f32 = 0.005;
pub const T2_BASE: f32 = 293.15;
pub const PSFC: f32 = 100_000.0;
pub const Q2: f32 = 0.0073;
pub const HGT: f32 = 50.0;

/// One byte of a netCDF `NC_CHAR` variable
///
/// netcdf 0.11 does not treat `i8`/`u8` as text, so WRF's character
/// variables need their own type to be written.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NcChar(pub u8);

unsafe impl NcTypeDescriptor for NcChar {
    fn type_descriptor() -> NcVariableType {
        NcVariableType::Char
    }
}

pub fn wrf_time_string(hour: usize) -> String {
    format!("2024-03-01_{:02}:00:00", hour)
}

/// Conventional WRF file name for a file starting at `hour`
pub fn wrfout_name(hour: usize) -> String {
    format!("wrfout_d01_{}", wrf_time_string(hour))
}

/// Write a WRF-like file holding `ntime` hourly steps starting at `first_hour`.
pub fn write_wrfout(
    path: &Path,
    first_hour: usize,
    ntime: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = create(path)?;

    file.add_dimension("Time", ntime)?;
    file.add_dimension("DateStrLen", 19)?;
    file.add_dimension("bottom_top", NZ)?;
    file.add_dimension("bottom_top_stag", NZ + 1)?;
    file.add_dimension("south_north", NY)?;
    file.add_dimension("south_north_stag", NY + 1)?;
    file.add_dimension("west_east", NX)?;
    file.add_dimension("west_east_stag", NX + 1)?;

    file.add_attribute("TITLE", " OUTPUT FROM WRF V4.5 MODEL")?;

    {
        let chars: Vec<NcChar> = (0..ntime)
            .flat_map(|t| wrf_time_string(first_hour + t).into_bytes())
            .map(NcChar)
            .collect();
        let times = Array2::from_shape_vec((ntime, 19), chars)?;
        let mut var = file.add_variable_with_type(
            "Times",
            &["Time", "DateStrLen"],
            &NcVariableType::Char,
        )?;
        var.put(times.view(), ..)?;
    }

    let mass = ["Time", "bottom_top", "south_north", "west_east"];
    let surface = ["Time", "south_north", "west_east"];
    let hour = |t: usize| (first_hour + t) as f32;

    {
        let data = Array4::from_shape_fn((ntime, NZ, NY, NX), |(t, k, _, _)| {
            T_LEVELS[k] + hour(t)
        });
        let mut var = file.add_variable::<f32>("T", &mass)?;
        var.put_attribute("units", "K")?;
        var.put_attribute("description", "perturbation potential temperature theta-t0")?;
        var.put(data.view(), ..)?;
    }

    {
        let mut var = file.add_variable::<f32>("P", &mass)?;
        var.put_attribute("units", "Pa")?;
        var.put(Array4::<f32>::zeros((ntime, NZ, NY, NX)).view(), ..)?;
    }

    {
        let data = Array4::from_shape_fn((ntime, NZ, NY, NX), |(_, k, _, _)| PB_LEVELS[k]);
        let mut var = file.add_variable::<f32>("PB", &mass)?;
        var.put_attribute("units", "Pa")?;
        var.put(data.view(), ..)?;
    }

    {
        let data = Array4::from_elem((ntime, NZ, NY, NX), QVAPOR);
        let mut var = file.add_variable::<f32>("QVAPOR", &mass)?;
        var.put_attribute("units", "kg kg-1")?;
        var.put_attribute("description", "Water vapor mixing ratio")?;
        var.put(data.view(), ..)?;
    }

    let stag_vertical = ["Time", "bottom_top_stag", "south_north", "west_east"];
    {
        let mut var = file.add_variable::<f32>("PH", &stag_vertical)?;
        var.put(Array4::<f32>::zeros((ntime, NZ + 1, NY, NX)).view(), ..)?;
    }

    {
        let data =
            Array4::from_shape_fn((ntime, NZ + 1, NY, NX), |(_, k, _, _)| Z_STAG[k] * 9.81);
        let mut var = file.add_variable::<f32>("PHB", &stag_vertical)?;
        var.put(data.view(), ..)?;
    }

    {
        let data = Array4::from_shape_fn((ntime, NZ + 1, NY, NX), |(_, k, _, _)| k as f32);
        let mut var = file.add_variable::<f32>("W", &stag_vertical)?;
        var.put(data.view(), ..)?;
    }

    {
        let data = Array4::from_shape_fn((ntime, NZ, NY, NX + 1), |(_, _, _, i)| 2.0 * i as f32);
        let mut var =
            file.add_variable::<f32>("U", &["Time", "bottom_top", "south_north", "west_east_stag"])?;
        var.put_attribute("units", "m s-1")?;
        var.put(data.view(), ..)?;
    }

    {
        let data = Array4::from_shape_fn((ntime, NZ, NY + 1, NX), |(_, _, j, _)| 2.0 * j as f32);
        let mut var =
            file.add_variable::<f32>("V", &["Time", "bottom_top", "south_north_stag", "west_east"])?;
        var.put_attribute("units", "m s-1")?;
        var.put(data.view(), ..)?;
    }

    for (name, units, value) in [
        ("HGT", "m", HGT),
        ("PSFC", "Pa", PSFC),
        ("Q2", "kg kg-1", Q2),
    ] {
        let data = Array3::from_elem((ntime, NY, NX), value);
        let mut var = file.add_variable::<f32>(name, &surface)?;
        var.put_attribute("units", units)?;
        var.put(data.view(), ..)?;
    }

    {
        let data = Array3::from_shape_fn((ntime, NY, NX), |(t, _, _)| T2_BASE + hour(t));
        let mut var = file.add_variable::<f32>("T2", &surface)?;
        var.put_attribute("units", "K")?;
        var.put_attribute("description", "TEMP at 2 M")?;
        var.put(data.view(), ..)?;
    }

    {
        let data = Array3::from_shape_fn((ntime, NY, NX), |(_, j, _)| -18.0 + j as f32);
        let mut var = file.add_variable::<f32>("XLAT", &surface)?;
        var.put_attribute("units", "degree_north")?;
        var.put(data.view(), ..)?;
    }

    {
        let data = Array3::from_shape_fn((ntime, NY, NX), |(_, _, i)| 178.0 + i as f32);
        let mut var = file.add_variable::<f32>("XLONG", &surface)?;
        var.put_attribute("units", "degree_east")?;
        var.put(data.view(), ..)?;
    }

    Ok(())
}

/// Write a run folder with one file per entry of `(first_hour, ntime)`.
pub fn write_run(
    folder: &Path,
    files: &[(usize, usize)],
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    // created newest first so directory order differs from time order
    let mut paths = Vec::new();
    for &(first_hour, ntime) in files.iter().rev() {
        let path = folder.join(wrfout_name(first_hour));
        write_wrfout(&path, first_hour, ntime)?;
        paths.push(path);
    }
    paths.reverse();
    Ok(paths)
}
