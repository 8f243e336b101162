//! Loading WRF output from disk
//!
//! [`load_one_wrf`] reads a variable from a single file and [`load_all_wrf`]
//! concatenates it over every `wrfout*` file of a run directory. Both check
//! the path up front so a missing file or folder is reported as such rather
//! than as a NetCDF error.

use crate::data_array::WrfDataArray;
use crate::errors::{Result, WrfError};
use crate::extract::{getvar, CombineMethod, TimeIndex};
use log::{debug, info};
use netcdf::File;
use std::fs;
use std::path::{Path, PathBuf};

/// File name prefix of WRF history output
pub const WRFOUT_PREFIX: &str = "wrfout";

/// Load a variable over every time step of one WRF file.
///
/// # Errors
///
/// Returns [`WrfError::FileNotFound`] if `filename` does not exist, and a
/// NetCDF or extraction error if the file cannot be read.
pub fn load_one_wrf<P: AsRef<Path>>(filename: P, varname: &str) -> Result<WrfDataArray> {
    load_one_wrf_at(filename, varname, TimeIndex::All)
}

/// Load a variable from one WRF file, optionally keeping a single time step.
pub fn load_one_wrf_at<P: AsRef<Path>>(
    filename: P,
    varname: &str,
    timeidx: TimeIndex,
) -> Result<WrfDataArray> {
    let path = filename.as_ref();
    if !path.exists() {
        return Err(WrfError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = netcdf::open(path)?;
    debug!("Opened WRF file {}", path.display());

    getvar(&[file], varname, timeidx, CombineMethod::Cat)
}

/// Load a variable from every `wrfout*` file in a folder, concatenated over time.
///
/// # Errors
///
/// Returns [`WrfError::FolderNotFound`] if `folder_path` is not a directory,
/// [`WrfError::NoWrfFiles`] if it contains no `wrfout*` files, and a NetCDF or
/// extraction error if any file cannot be read.
pub fn load_all_wrf<P: AsRef<Path>>(folder_path: P, varname: &str) -> Result<WrfDataArray> {
    load_all_wrf_with(folder_path, varname, TimeIndex::All, CombineMethod::Cat)
}

/// Load a variable from every `wrfout*` file in a folder with explicit time
/// selection and combine method.
pub fn load_all_wrf_with<P: AsRef<Path>>(
    folder_path: P,
    varname: &str,
    timeidx: TimeIndex,
    method: CombineMethod,
) -> Result<WrfDataArray> {
    let paths = find_wrf_files(folder_path)?;

    let files = paths
        .iter()
        .map(|path| {
            debug!("Opening {}", path.display());
            netcdf::open(path).map_err(WrfError::from)
        })
        .collect::<Result<Vec<File>>>()?;

    getvar(&files, varname, timeidx, method)
}

/// List the `wrfout*` files of a folder, sorted by file name.
///
/// WRF embeds the first valid time in the file name, so name order is time
/// order. Subdirectories are skipped even when their name matches.
///
/// # Errors
///
/// Returns [`WrfError::FolderNotFound`] if `folder` is not a directory and
/// [`WrfError::NoWrfFiles`] if nothing matches.
pub fn find_wrf_files<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(WrfError::FolderNotFound {
            path: folder.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let is_wrfout = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(WRFOUT_PREFIX));

        if is_wrfout && entry.path().is_file() {
            paths.push(entry.path());
        }
    }

    if paths.is_empty() {
        return Err(WrfError::NoWrfFiles {
            folder: folder.to_path_buf(),
        });
    }

    paths.sort();
    info!(
        "Found {} WRF file(s) in {}",
        paths.len(),
        folder.display()
    );

    Ok(paths)
}
