//! Diagnostic variables computed from raw WRF fields
//!
//! WRF output stores most quantities in a form that needs post-processing:
//! pressure and geopotential are split into base state and perturbation,
//! temperature is a perturbation potential temperature and winds live on
//! staggered grids. This module turns those raw fields into the quantities
//! people actually plot.
//!
//! # Organization
//!
//! - [`thermo`]: temperature, humidity and dew point formulas
//! - [`slp`]: sea level pressure reduction
//! - [`wind`]: wind speed and direction
//! - [`destagger`]: moving staggered fields onto the mass grid

pub mod destagger;
pub mod slp;
pub mod thermo;
pub mod wind;

pub use destagger::destagger;

use crate::data_array::WrfDataArray;
use crate::errors::{Result, WrfError};
use crate::extract::read_field;
use log::debug;
use ndarray::{Ix4, Zip};
use netcdf::File;

/// Variables that are computed rather than read directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// Temperature in K
    Tk,
    /// Temperature in degrees Celsius
    Tc,
    /// Potential temperature
    Theta,
    /// Full pressure in Pa
    Pres,
    /// Full pressure in hPa
    Pressure,
    /// Geopotential on mass levels
    Geopt,
    /// Height above sea level on mass levels
    Height,
    /// Terrain height
    Terrain,
    /// Sea level pressure
    Slp,
    /// Relative humidity
    Rh,
    /// Dew point temperature
    Td,
    /// 2 m relative humidity
    Rh2,
    /// 2 m dew point temperature
    Td2,
    /// x-wind on the mass grid
    Ua,
    /// y-wind on the mass grid
    Va,
    /// Vertical wind on the mass grid
    Wa,
    /// Horizontal wind speed
    Wspd,
    /// Wind direction
    Wdir,
    /// Latitude
    Lat,
    /// Longitude
    Lon,
}

impl Diagnostic {
    pub const ALL: [Diagnostic; 20] = [
        Self::Tk,
        Self::Tc,
        Self::Theta,
        Self::Pres,
        Self::Pressure,
        Self::Geopt,
        Self::Height,
        Self::Terrain,
        Self::Slp,
        Self::Rh,
        Self::Td,
        Self::Rh2,
        Self::Td2,
        Self::Ua,
        Self::Va,
        Self::Wa,
        Self::Wspd,
        Self::Wdir,
        Self::Lat,
        Self::Lon,
    ];

    /// Look up a diagnostic by name or alias.
    pub fn from_name(name: &str) -> Option<Self> {
        let diag = match name {
            "tk" => Self::Tk,
            "tc" => Self::Tc,
            "theta" | "th" => Self::Theta,
            "pres" => Self::Pres,
            "pressure" => Self::Pressure,
            "geopt" | "geopotential" => Self::Geopt,
            "z" | "height" => Self::Height,
            "ter" => Self::Terrain,
            "slp" => Self::Slp,
            "rh" => Self::Rh,
            "td" => Self::Td,
            "rh2" => Self::Rh2,
            "td2" => Self::Td2,
            "ua" => Self::Ua,
            "va" => Self::Va,
            "wa" => Self::Wa,
            "wspd" => Self::Wspd,
            "wdir" => Self::Wdir,
            "lat" => Self::Lat,
            "lon" => Self::Lon,
            _ => return None,
        };
        Some(diag)
    }

    /// Canonical name, also used as the name of the resulting array
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tk => "tk",
            Self::Tc => "tc",
            Self::Theta => "theta",
            Self::Pres => "pres",
            Self::Pressure => "pressure",
            Self::Geopt => "geopt",
            Self::Height => "z",
            Self::Terrain => "ter",
            Self::Slp => "slp",
            Self::Rh => "rh",
            Self::Td => "td",
            Self::Rh2 => "rh2",
            Self::Td2 => "td2",
            Self::Ua => "ua",
            Self::Va => "va",
            Self::Wa => "wa",
            Self::Wspd => "wspd",
            Self::Wdir => "wdir",
            Self::Lat => "lat",
            Self::Lon => "lon",
        }
    }

    #[must_use]
    pub const fn units(self) -> &'static str {
        match self {
            Self::Tk | Self::Theta => "K",
            Self::Tc | Self::Td | Self::Td2 => "degC",
            Self::Pres => "Pa",
            Self::Pressure | Self::Slp => "hPa",
            Self::Geopt => "m2 s-2",
            Self::Height | Self::Terrain => "m",
            Self::Rh | Self::Rh2 => "%",
            Self::Ua | Self::Va | Self::Wa | Self::Wspd => "m s-1",
            Self::Wdir => "degree",
            Self::Lat => "degree_north",
            Self::Lon => "degree_east",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Tk | Self::Tc => "temperature",
            Self::Theta => "potential temperature",
            Self::Pres | Self::Pressure => "pressure",
            Self::Geopt => "full model geopotential",
            Self::Height => "model height",
            Self::Terrain => "terrain height",
            Self::Slp => "sea level pressure",
            Self::Rh => "relative humidity",
            Self::Td => "dew point temperature",
            Self::Rh2 => "2m relative humidity",
            Self::Td2 => "2m dew point temperature",
            Self::Ua => "destaggered u-wind component",
            Self::Va => "destaggered v-wind component",
            Self::Wa => "destaggered w-wind component",
            Self::Wspd => "wind speed",
            Self::Wdir => "wind direction",
            Self::Lat => "latitude",
            Self::Lon => "longitude",
        }
    }

    /// Raw variables the diagnostic is computed from
    #[must_use]
    pub const fn required_variables(self) -> &'static [&'static str] {
        match self {
            Self::Tk | Self::Tc => &["T", "P", "PB"],
            Self::Theta => &["T"],
            Self::Pres | Self::Pressure => &["P", "PB"],
            Self::Geopt | Self::Height => &["PH", "PHB"],
            Self::Terrain => &["HGT"],
            Self::Slp => &["T", "P", "PB", "QVAPOR", "PH", "PHB"],
            Self::Rh => &["T", "P", "PB", "QVAPOR"],
            Self::Td => &["P", "PB", "QVAPOR"],
            Self::Rh2 => &["T2", "PSFC", "Q2"],
            Self::Td2 => &["PSFC", "Q2"],
            Self::Ua => &["U"],
            Self::Va => &["V"],
            Self::Wa => &["W"],
            Self::Wspd | Self::Wdir => &["U", "V"],
            Self::Lat => &["XLAT"],
            Self::Lon => &["XLONG"],
        }
    }

    /// Whether every input of the diagnostic is present in `file`
    pub fn is_available(self, file: &File) -> bool {
        self.required_variables()
            .iter()
            .all(|name| file.variable(name).is_some())
    }
}

/// Compute a diagnostic over every time step of one file.
pub fn compute(file: &File, diag: Diagnostic) -> Result<WrfDataArray> {
    debug!("Computing diagnostic '{}'", diag.name());

    let result = match diag {
        Diagnostic::Tk => temperature(file)?,
        Diagnostic::Tc => map1(&temperature(file)?, |t| t - thermo::CELKEL)?,
        Diagnostic::Theta => map1(&read_field(file, "T")?, |t| t + thermo::T_BASE)?,
        Diagnostic::Pres => full_pressure(file)?,
        Diagnostic::Pressure => map1(&full_pressure(file)?, |p| p * 0.01)?,
        Diagnostic::Geopt => geopotential(file)?,
        Diagnostic::Height => map1(&geopotential(file)?, |phi| phi / thermo::G)?,
        Diagnostic::Terrain => read_field(file, "HGT")?,
        Diagnostic::Slp => sea_level_pressure(file)?,
        Diagnostic::Rh => {
            let qv = read_field(file, "QVAPOR")?;
            let p = full_pressure(file)?;
            let t = temperature(file)?;
            map3(&qv, &p, &t, thermo::relative_humidity)?
        }
        Diagnostic::Td => {
            let qv = read_field(file, "QVAPOR")?;
            let p = full_pressure(file)?;
            map2(&qv, &p, thermo::dewpoint)?
        }
        Diagnostic::Rh2 => {
            let q2 = read_field(file, "Q2")?;
            let psfc = read_field(file, "PSFC")?;
            let t2 = read_field(file, "T2")?;
            map3(&q2, &psfc, &t2, thermo::relative_humidity)?
        }
        Diagnostic::Td2 => {
            let q2 = read_field(file, "Q2")?;
            let psfc = read_field(file, "PSFC")?;
            map2(&q2, &psfc, thermo::dewpoint)?
        }
        Diagnostic::Ua => destagger(&read_field(file, "U")?, "west_east_stag")?,
        Diagnostic::Va => destagger(&read_field(file, "V")?, "south_north_stag")?,
        Diagnostic::Wa => destagger(&read_field(file, "W")?, "bottom_top_stag")?,
        Diagnostic::Wspd => {
            let (u, v) = mass_grid_winds(file)?;
            map2(&u, &v, wind::wind_speed)?
        }
        Diagnostic::Wdir => {
            let (u, v) = mass_grid_winds(file)?;
            map2(&u, &v, wind::wind_direction)?
        }
        Diagnostic::Lat => read_field(file, "XLAT")?,
        Diagnostic::Lon => read_field(file, "XLONG")?,
    };

    Ok(label(result, diag))
}

/// Replace name and attributes with those describing `diag`.
fn label(mut array: WrfDataArray, diag: Diagnostic) -> WrfDataArray {
    array.name = diag.name().to_string();
    array.attributes.clear();
    array
        .with_attribute("units", diag.units())
        .with_attribute("description", diag.description())
}

/// P + PB, Pa
fn full_pressure(file: &File) -> Result<WrfDataArray> {
    let p = read_field(file, "P")?;
    let pb = read_field(file, "PB")?;
    map2(&p, &pb, |a, b| a + b)
}

/// Temperature in K from perturbation potential temperature and pressure
fn temperature(file: &File) -> Result<WrfDataArray> {
    let t = read_field(file, "T")?;
    let p = full_pressure(file)?;
    map2(&t, &p, |theta, pres| {
        thermo::temperature_from_theta(theta + thermo::T_BASE, pres)
    })
}

/// PH + PHB moved from the staggered levels to the mass levels
fn geopotential(file: &File) -> Result<WrfDataArray> {
    let ph = read_field(file, "PH")?;
    let phb = read_field(file, "PHB")?;
    let staggered = map2(&ph, &phb, |a, b| a + b)?;
    destagger(&staggered, "bottom_top_stag")
}

fn mass_grid_winds(file: &File) -> Result<(WrfDataArray, WrfDataArray)> {
    let u = destagger(&read_field(file, "U")?, "west_east_stag")?;
    let v = destagger(&read_field(file, "V")?, "south_north_stag")?;
    Ok((u, v))
}

fn sea_level_pressure(file: &File) -> Result<WrfDataArray> {
    let p = full_pressure(file)?;
    let t = temperature(file)?;
    let qv = read_field(file, "QVAPOR")?;
    let z = map1(&geopotential(file)?, |phi| phi / thermo::G)?;

    let level_axis = p
        .dim_index("bottom_top")
        .ok_or_else(|| WrfError::DimensionNotFound {
            var: "P".to_string(),
            dim: "bottom_top".to_string(),
        })?;

    let data = slp::sea_level_pressure(
        p.data.view().into_dimensionality::<Ix4>()?,
        t.data.view().into_dimensionality::<Ix4>()?,
        qv.data.view().into_dimensionality::<Ix4>()?,
        z.data.view().into_dimensionality::<Ix4>()?,
    )?;

    let mut dims = p.dims.clone();
    dims.remove(level_axis);

    Ok(WrfDataArray::new("slp", data.into_dyn(), dims)?.with_times(p.times))
}

fn ensure_same_shape(a: &WrfDataArray, b: &WrfDataArray) -> Result<()> {
    if a.shape() == b.shape() {
        Ok(())
    } else {
        Err(WrfError::ShapeMismatch {
            message: format!(
                "'{}' has shape {:?} but '{}' has shape {:?}",
                a.name,
                a.shape(),
                b.name,
                b.shape()
            ),
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn map1<F>(a: &WrfDataArray, f: F) -> Result<WrfDataArray>
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    let data = Zip::from(&a.data).par_map_collect(|&x| f(f64::from(x)) as f32);
    a.with_data(a.name.clone(), data)
}

#[allow(clippy::cast_possible_truncation)]
fn map2<F>(a: &WrfDataArray, b: &WrfDataArray, f: F) -> Result<WrfDataArray>
where
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    ensure_same_shape(a, b)?;
    let data = Zip::from(&a.data)
        .and(&b.data)
        .par_map_collect(|&x, &y| f(f64::from(x), f64::from(y)) as f32);
    a.with_data(a.name.clone(), data)
}

#[allow(clippy::cast_possible_truncation)]
fn map3<F>(a: &WrfDataArray, b: &WrfDataArray, c: &WrfDataArray, f: F) -> Result<WrfDataArray>
where
    F: Fn(f64, f64, f64) -> f64 + Sync + Send,
{
    ensure_same_shape(a, b)?;
    ensure_same_shape(a, c)?;
    let data = Zip::from(&a.data)
        .and(&b.data)
        .and(&c.data)
        .par_map_collect(|&x, &y, &z| f(f64::from(x), f64::from(y), f64::from(z)) as f32);
    a.with_data(a.name.clone(), data)
}
