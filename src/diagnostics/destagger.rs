//! Moving staggered (cell-face) fields onto the mass grid

use crate::data_array::WrfDataArray;
use crate::errors::{Result, WrfError};
use ndarray::{Axis, Slice};

/// Suffix WRF appends to staggered dimension names
pub const STAG_SUFFIX: &str = "_stag";

/// Average adjacent points along `stag_dim`, shrinking it by one.
///
/// The staggered dimension is renamed to its mass-grid name, so
/// `bottom_top_stag` becomes `bottom_top`.
pub fn destagger(array: &WrfDataArray, stag_dim: &str) -> Result<WrfDataArray> {
    let axis = array
        .dim_index(stag_dim)
        .ok_or_else(|| WrfError::DimensionNotFound {
            var: array.name.clone(),
            dim: stag_dim.to_string(),
        })?;

    let n = array.data.len_of(Axis(axis));
    if n < 2 {
        return Err(WrfError::ShapeMismatch {
            message: format!(
                "cannot destagger '{}' along '{}' with only {} point(s)",
                array.name, stag_dim, n
            ),
        });
    }

    let lower = array.data.slice_axis(Axis(axis), Slice::from(0..n - 1));
    let upper = array.data.slice_axis(Axis(axis), Slice::from(1..n));
    let data = (&lower + &upper) * 0.5;

    let mut dims = array.dims.clone();
    dims[axis] = stag_dim
        .strip_suffix(STAG_SUFFIX)
        .unwrap_or(stag_dim)
        .to_string();

    Ok(WrfDataArray {
        name: array.name.clone(),
        data,
        dims,
        times: array.times.clone(),
        attributes: array.attributes.clone(),
    })
}
