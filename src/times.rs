//! Decoding of the WRF `Times` variable
//!
//! WRF stores valid times as a `Time x DateStrLen` character array holding
//! strings such as `2024-03-01_06:00:00`.

use crate::errors::{Result, WrfError};
use chrono::NaiveDateTime;
use log::{debug, warn};
use netcdf::File;

/// Name of the character variable holding the valid times
pub const TIMES_VAR: &str = "Times";

/// `strftime` layout of a WRF time string
pub const WRF_TIME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Parse one WRF time string, ignoring trailing NULs and blanks.
pub fn parse_wrf_time(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(trimmed, WRF_TIME_FORMAT).map_err(|_| WrfError::InvalidTime {
        value: trimmed.to_string(),
    })
}

/// Format a valid time the way WRF writes it.
pub fn format_wrf_time(time: &NaiveDateTime) -> String {
    time.format(WRF_TIME_FORMAT).to_string()
}

/// Split the raw bytes of a `Times` variable into parsed times.
pub fn decode_times(raw: &[u8], str_len: usize) -> Result<Vec<NaiveDateTime>> {
    if str_len == 0 {
        return Ok(Vec::new());
    }

    raw.chunks(str_len)
        .map(|chunk| parse_wrf_time(&String::from_utf8_lossy(chunk)))
        .collect()
}

/// Read the valid times of a WRF file.
///
/// Returns an empty list when the file has no usable `Times` variable, so that
/// plain NetCDF files with WRF-style variables can still be loaded.
pub fn read_times(file: &File) -> Result<Vec<NaiveDateTime>> {
    let Some(var) = file.variable(TIMES_VAR) else {
        debug!("No '{}' variable, loading without a time coordinate", TIMES_VAR);
        return Ok(Vec::new());
    };

    let dims = var.dimensions();
    if dims.len() != 2 {
        warn!(
            "'{}' has {} dimensions instead of 2, ignoring it",
            TIMES_VAR,
            dims.len()
        );
        return Ok(Vec::new());
    }

    let str_len = dims[1].len();
    let raw = var.get_raw_values(..)?;
    decode_times(&raw, str_len)
}
