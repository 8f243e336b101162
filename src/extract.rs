//! Variable extraction from one or more open WRF files
//!
//! [`getvar`] is the single entry point: it resolves a name to either a
//! [`Diagnostic`] or a raw file variable, extracts it from every file and
//! combines the per-file results along time.

use crate::data_array::{WrfDataArray, TIME_DIM};
use crate::diagnostics::{self, Diagnostic};
use crate::errors::{Result, WrfError};
use crate::times::read_times;
use log::{debug, warn};
use netcdf::{AttributeValue, File};
use ndarray::{ArrayD, IxDyn};
use std::fmt;
use std::str::FromStr;

/// Which time steps to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeIndex {
    /// Every time step of every file
    #[default]
    All,
    /// One time step of the combined sequence; negative values count from the end
    Single(isize),
}

/// How per-file arrays are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineMethod {
    /// Concatenate along the `Time` dimension
    #[default]
    Cat,
    /// Stack along a new leading `file` dimension
    Join,
}

impl CombineMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cat => "cat",
            Self::Join => "join",
        }
    }
}

impl fmt::Display for CombineMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CombineMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cat" => Ok(Self::Cat),
            "join" => Ok(Self::Join),
            other => Err(format!(
                "Invalid combine method '{other}': expected 'cat' or 'join'"
            )),
        }
    }
}

/// Extract `varname` from a sequence of WRF files.
///
/// Diagnostics (see [`Diagnostic::from_name`]) are computed from the raw
/// fields; any other name is read as-is. Results from several files are
/// combined with `method` before `timeidx` is applied, so a single index
/// addresses the combined time sequence.
///
/// # Errors
///
/// Returns an error if `files` is empty, the variable is missing from any
/// file, the files cannot be combined or the time index is out of range.
pub fn getvar(
    files: &[File],
    varname: &str,
    timeidx: TimeIndex,
    method: CombineMethod,
) -> Result<WrfDataArray> {
    if files.is_empty() {
        return Err(WrfError::IncompatibleFiles {
            message: "no files to extract from".to_string(),
        });
    }

    let per_file = files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            debug!("Extracting '{}' from file {} of {}", varname, i + 1, files.len());
            extract_from_file(file, varname)
        })
        .collect::<Result<Vec<_>>>()?;

    let combined = combine(per_file, method)?;

    match timeidx {
        TimeIndex::All => Ok(combined),
        TimeIndex::Single(index) if combined.time_axis().is_some() => combined.select_time(index),
        TimeIndex::Single(_) => {
            debug!("'{}' has no {} dimension, ignoring time index", varname, TIME_DIM);
            Ok(combined)
        }
    }
}

/// Extract `varname` from a single file over all of its time steps.
pub fn extract_from_file(file: &File, varname: &str) -> Result<WrfDataArray> {
    match Diagnostic::from_name(varname) {
        Some(diag) => diagnostics::compute(file, diag),
        None => read_field(file, varname),
    }
}

fn combine(mut arrays: Vec<WrfDataArray>, method: CombineMethod) -> Result<WrfDataArray> {
    if arrays.len() == 1 {
        return Ok(arrays.remove(0));
    }

    match method {
        CombineMethod::Join => WrfDataArray::stack_files(arrays),
        CombineMethod::Cat if arrays[0].time_axis().is_some() => WrfDataArray::concat_time(arrays),
        CombineMethod::Cat => {
            // time-invariant fields are identical in every file
            debug!(
                "'{}' has no {} dimension, keeping the first file's values",
                arrays[0].name, TIME_DIM
            );
            Ok(arrays.remove(0))
        }
    }
}

/// Read a raw variable with its dimension names, string attributes and,
/// when it varies in time, the file's valid times.
pub fn read_field(file: &File, name: &str) -> Result<WrfDataArray> {
    let var = file
        .variable(name)
        .ok_or_else(|| WrfError::VariableNotFound {
            var: name.to_string(),
        })?;

    let dims: Vec<String> = var
        .dimensions()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    let shape: Vec<usize> = var
        .dimensions()
        .iter()
        .map(netcdf::Dimension::len)
        .collect();

    let values = var.get_values::<f32, _>(..)?;
    let data = ArrayD::from_shape_vec(IxDyn(&shape), values)?;

    let mut array = WrfDataArray::new(name, data, dims)?;

    for attr in var.attributes() {
        match attr.value() {
            Ok(AttributeValue::Str(value)) => {
                array.attributes.insert(attr.name().to_string(), value);
            }
            Ok(_) => {}
            Err(e) => warn!("Could not read attribute '{}' of '{}': {}", attr.name(), name, e),
        }
    }

    if let Some(axis) = array.time_axis() {
        match read_times(file) {
            Ok(times) if times.len() == array.shape()[axis] => array.times = times,
            Ok(times) if times.is_empty() => {}
            Ok(times) => warn!(
                "'{}' has {} time steps but the file lists {} times, ignoring them",
                name,
                array.shape()[axis],
                times.len()
            ),
            Err(e) => warn!("Could not decode valid times for '{}': {}", name, e),
        }
    }

    Ok(array)
}
