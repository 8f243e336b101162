//! Writing loaded arrays back to NetCDF
//!
//! A [`WrfDataArray`] is written with its own dimension names and string
//! attributes. When it carries valid times, a `time` coordinate is added in
//! minutes since the first time, the CF convention most tools understand.

use crate::data_array::{WrfDataArray, TIME_DIM};
use crate::errors::Result;
use crate::times::format_wrf_time;
use chrono::Utc;
use log::{debug, warn};
use ndarray::Array1;
use netcdf::create;
use std::{fs, path::Path};

/// Name of the coordinate variable written for valid times
pub const TIME_COORD: &str = "time";

/// Writer for loaded WRF arrays
pub struct NetCDFWriter<'a> {
    output_path: &'a Path,
}

impl<'a> NetCDFWriter<'a> {
    /// Create a new NetCDF writer
    pub fn new(output_path: &'a Path) -> Self {
        Self { output_path }
    }

    /// Write `array` to the output path, replacing any existing file.
    pub fn write_array(&self, array: &WrfDataArray) -> Result<()> {
        if self.output_path.exists() {
            fs::remove_file(self.output_path)?;
        }

        let mut file = create(self.output_path)?;

        for (dim_name, &dim_len) in array.dims.iter().zip(array.shape()) {
            file.add_dimension(dim_name, dim_len)?;
        }

        let dim_refs: Vec<&str> = array.dims.iter().map(String::as_str).collect();
        {
            let mut var = file.add_variable::<f32>(&array.name, &dim_refs)?;
            var.put_attribute("_FillValue", f32::NAN)?;
            for (key, value) in &array.attributes {
                if key == "_FillValue" {
                    continue;
                }
                var.put_attribute(key, value.as_str())?;
            }
            var.put(array.data.view(), ..)?;
        }

        match (array.time_axis(), array.times.first()) {
            (Some(axis), Some(start)) if array.times.len() == array.shape()[axis] => {
                let minutes: Array1<f64> = array
                    .times
                    .iter()
                    .map(|t| (*t - *start).num_seconds() as f64 / 60.0)
                    .collect();

                let mut time_var = file.add_variable::<f64>(TIME_COORD, &[TIME_DIM])?;
                time_var.put_attribute(
                    "units",
                    format!("minutes since {}", start.format("%Y-%m-%d %H:%M:%S")),
                )?;
                time_var.put_attribute("long_name", "valid time")?;
                time_var.put(minutes.view(), ..)?;
            }
            (Some(_), Some(_)) => {
                warn!(
                    "'{}' has a time coordinate that does not match its {} axis, not writing it",
                    array.name, TIME_DIM
                );
            }
            (None, Some(valid)) => {
                file.add_attribute("valid_time", format_wrf_time(valid))?;
            }
            _ => {}
        }

        file.add_attribute(
            "history",
            format!("Created by wrf_loader on {}", Utc::now().to_rfc3339()),
        )?;

        debug!(
            "Wrote '{}' with shape {:?} to {}",
            array.name,
            array.shape(),
            self.output_path.display()
        );

        Ok(())
    }
}

/// Write a loaded array to a new NetCDF file.
pub fn write_array_to_netcdf(array: &WrfDataArray, output_path: &Path) -> Result<()> {
    NetCDFWriter::new(output_path).write_array(array)
}
