//! Labeled arrays returned by the loaders
//!
//! A [`WrfDataArray`] bundles the values of one variable with its dimension
//! names, the valid times along the `Time` axis and the attributes describing
//! it. Combining arrays from several files happens here, either by
//! concatenating along `Time` or by stacking along a new `file` dimension.

use crate::errors::{Result, WrfError};
use crate::times::format_wrf_time;
use chrono::NaiveDateTime;
use log::warn;
use ndarray::{ArrayD, ArrayViewD, Axis, Slice};
use serde::Serialize;
use std::collections::BTreeMap;

/// Name of the WRF time dimension
pub const TIME_DIM: &str = "Time";

/// Name of the leading dimension added when stacking files
pub const FILE_DIM: &str = "file";

/// A variable's values together with their labels
#[derive(Debug, Clone)]
pub struct WrfDataArray {
    pub name: String,
    pub data: ArrayD<f32>,
    pub dims: Vec<String>,
    /// Valid times along the `Time` axis, empty when the source had none
    pub times: Vec<NaiveDateTime>,
    pub attributes: BTreeMap<String, String>,
}

/// Quick statistics over the finite values of an array
#[derive(Debug, Clone, Serialize)]
pub struct ArraySummary {
    pub name: String,
    pub units: Option<String>,
    pub description: Option<String>,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub first_time: Option<String>,
    pub last_time: Option<String>,
    pub valid_count: usize,
    pub total_count: usize,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub mean: Option<f64>,
}

impl WrfDataArray {
    /// Create a labeled array, checking that every axis has a name.
    pub fn new(name: impl Into<String>, data: ArrayD<f32>, dims: Vec<String>) -> Result<Self> {
        let name = name.into();
        if dims.len() != data.ndim() {
            return Err(WrfError::ShapeMismatch {
                message: format!(
                    "'{}' has {} dimension names for a {}-dimensional array",
                    name,
                    dims.len(),
                    data.ndim()
                ),
            });
        }

        Ok(Self {
            name,
            data,
            dims,
            times: Vec::new(),
            attributes: BTreeMap::new(),
        })
    }

    pub fn with_times(mut self, times: Vec<NaiveDateTime>) -> Self {
        self.times = times;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Replace the values, keeping names and labels.
    ///
    /// Used by diagnostics that compute a new field on the grid of an input.
    pub fn with_data(&self, name: impl Into<String>, data: ArrayD<f32>) -> Result<Self> {
        if data.shape() != self.data.shape() {
            return Err(WrfError::ShapeMismatch {
                message: format!(
                    "new data has shape {:?}, expected {:?}",
                    data.shape(),
                    self.data.shape()
                ),
            });
        }

        Ok(Self {
            name: name.into(),
            data,
            dims: self.dims.clone(),
            times: self.times.clone(),
            attributes: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Position of a named dimension
    pub fn dim_index(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    pub fn time_axis(&self) -> Option<usize> {
        self.dim_index(TIME_DIM)
    }

    /// Number of steps along `Time`, or 0 when the array has no time axis
    pub fn time_len(&self) -> usize {
        self.time_axis().map_or(0, |ax| self.data.len_of(Axis(ax)))
    }

    pub fn units(&self) -> Option<&str> {
        self.attributes.get("units").map(String::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.attributes.get("description").map(String::as_str)
    }

    /// Keep a single time step, dropping the `Time` axis.
    ///
    /// Negative indices count back from the last time.
    pub fn select_time(&self, index: isize) -> Result<Self> {
        let axis = self.time_axis().ok_or_else(|| WrfError::DimensionNotFound {
            var: self.name.clone(),
            dim: TIME_DIM.to_string(),
        })?;

        let idx = resolve_time_index(index, self.data.len_of(Axis(axis)))?;
        let data = self.data.index_axis(Axis(axis), idx).to_owned();

        let mut dims = self.dims.clone();
        dims.remove(axis);

        Ok(Self {
            name: self.name.clone(),
            data,
            dims,
            times: self.times.get(idx).copied().into_iter().collect(),
            attributes: self.attributes.clone(),
        })
    }

    /// Concatenate arrays along their `Time` axis.
    ///
    /// All arrays must share dimension names and every non-time extent. The
    /// time coordinate is kept only when each input carries one.
    pub fn concat_time(arrays: Vec<Self>) -> Result<Self> {
        let first = check_compatible(&arrays)?;
        let axis = first.time_axis().ok_or_else(|| WrfError::DimensionNotFound {
            var: first.name.clone(),
            dim: TIME_DIM.to_string(),
        })?;

        let views: Vec<ArrayViewD<f32>> = arrays.iter().map(|a| a.data.view()).collect();
        let data = ndarray::concatenate(Axis(axis), &views)?;

        let times = if arrays.iter().all(|a| a.times.len() == a.time_len()) {
            arrays.iter().flat_map(|a| a.times.iter().copied()).collect()
        } else {
            warn!(
                "Not every file provides valid times for '{}', dropping the time coordinate",
                first.name
            );
            Vec::new()
        };

        Ok(Self {
            name: first.name.clone(),
            data,
            dims: first.dims.clone(),
            times,
            attributes: first.attributes.clone(),
        })
    }

    /// Stack arrays along a new leading `file` dimension.
    ///
    /// Arrays with fewer time steps than the longest one are padded with NaN.
    pub fn stack_files(arrays: Vec<Self>) -> Result<Self> {
        let first = check_compatible(&arrays)?;
        let time_axis = first.time_axis();

        let longest = arrays
            .iter()
            .max_by_key(|a| a.time_len())
            .unwrap_or(first);
        let target_shape = longest.shape().to_vec();

        let padded: Vec<ArrayD<f32>> = arrays
            .iter()
            .map(|a| match time_axis {
                Some(ax) if a.shape() != target_shape.as_slice() => {
                    let mut out = ArrayD::from_elem(target_shape.clone(), f32::NAN);
                    out.slice_axis_mut(Axis(ax), Slice::from(0..a.time_len()))
                        .assign(&a.data);
                    out
                }
                _ => a.data.clone(),
            })
            .collect();

        let views: Vec<ArrayViewD<f32>> = padded.iter().map(|a| a.view()).collect();
        let data = ndarray::stack(Axis(0), &views)?;

        let mut dims = Vec::with_capacity(first.dims.len() + 1);
        dims.push(FILE_DIM.to_string());
        dims.extend(first.dims.iter().cloned());

        let times = if longest.times.len() == longest.time_len() {
            longest.times.clone()
        } else {
            Vec::new()
        };

        Ok(Self {
            name: first.name.clone(),
            data,
            dims,
            times,
            attributes: first.attributes.clone(),
        })
    }

    /// Statistics over the finite values of the array
    pub fn summary(&self) -> ArraySummary {
        let valid: Vec<f32> = self.data.iter().copied().filter(|x| x.is_finite()).collect();

        let (min, max, mean) = if valid.is_empty() {
            (None, None, None)
        } else {
            let min = valid.iter().copied().fold(f32::INFINITY, f32::min);
            let max = valid.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let mean = valid.iter().map(|&x| f64::from(x)).sum::<f64>() / valid.len() as f64;
            (Some(min), Some(max), Some(mean))
        };

        ArraySummary {
            name: self.name.clone(),
            units: self.units().map(str::to_string),
            description: self.description().map(str::to_string),
            dims: self.dims.clone(),
            shape: self.shape().to_vec(),
            first_time: self.times.first().map(format_wrf_time),
            last_time: self.times.last().map(format_wrf_time),
            valid_count: valid.len(),
            total_count: self.data.len(),
            min,
            max,
            mean,
        }
    }
}

/// Turn a possibly negative time index into a position within `available`.
pub(crate) fn resolve_time_index(index: isize, available: usize) -> Result<usize> {
    let resolved = if index < 0 {
        available.checked_sub(index.unsigned_abs())
    } else {
        Some(index.unsigned_abs()).filter(|&i| i < available)
    };

    resolved.ok_or(WrfError::InvalidTimeIndex { index, available })
}

/// Check that arrays agree on dimension names and on every extent except the
/// time axis. Returns the first array.
fn check_compatible(arrays: &[WrfDataArray]) -> Result<&WrfDataArray> {
    let first = arrays.first().ok_or_else(|| WrfError::IncompatibleFiles {
        message: "no arrays to combine".to_string(),
    })?;
    let time_axis = first.time_axis();

    for other in &arrays[1..] {
        if other.dims != first.dims {
            return Err(WrfError::IncompatibleFiles {
                message: format!(
                    "'{}' has dimensions [{}] in one file and [{}] in another",
                    first.name,
                    first.dims.join(", "),
                    other.dims.join(", ")
                ),
            });
        }

        let mismatch = first
            .shape()
            .iter()
            .zip(other.shape())
            .enumerate()
            .find(|&(ax, (a, b))| a != b && Some(ax) != time_axis);

        if let Some((ax, (a, b))) = mismatch {
            return Err(WrfError::IncompatibleFiles {
                message: format!(
                    "'{}' has {} = {} in one file and {} in another",
                    first.name, first.dims[ax], a, b
                ),
            });
        }
    }

    Ok(first)
}
