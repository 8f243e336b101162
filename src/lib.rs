//! wrf_loader: load variables from WRF model output
//!
//! WRF (Weather Research and Forecasting model) writes its history output as
//! NetCDF files named `wrfout_<domain>_<valid time>`. This crate loads a
//! variable from one such file, or from every `wrfout*` file of a run folder
//! concatenated along time, and returns it as a labeled array.
//!
//! Besides the raw file variables, commonly used diagnostics are computed on
//! the fly from the fields WRF stores: temperature (`tk`, `tc`), pressure
//! (`pressure`), height (`z`), sea level pressure (`slp`), humidity (`rh`,
//! `td`) and winds on the mass grid (`ua`, `va`, `wspd`, `wdir`).
//!
//! ## Module Organization
//!
//! - [`loader`]: file and folder loading entry points
//! - [`extract`]: variable extraction and combination across files
//! - [`diagnostics`]: computed variables
//! - [`data_array`]: the labeled array type
//! - [`times`]: decoding of WRF valid times
//! - [`metadata`]: file inspection
//! - [`netcdf_io`]: writing results to NetCDF
//! - [`parallel`]: parallel processing configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wrf_loader::{load_all_wrf, load_one_wrf};
//!
//! // Sea level pressure over a whole run
//! let slp = load_all_wrf("/data/wrf/run01", "slp").unwrap();
//! println!("{} times of {:?}", slp.time_len(), slp.shape());
//!
//! // 2 m temperature from a single file
//! let t2 = load_one_wrf("/data/wrf/run01/wrfout_d01_2024-03-01_00:00:00", "T2").unwrap();
//! println!("T2 units: {:?}", t2.units());
//! ```

pub mod data_array;
pub mod diagnostics;
pub mod errors;
pub mod extract;
pub mod loader;
pub mod metadata;
pub mod netcdf_io;
pub mod parallel;
pub mod times;

pub use data_array::{ArraySummary, WrfDataArray, FILE_DIM, TIME_DIM};
pub use diagnostics::Diagnostic;
pub use errors::{Result, WrfError};
pub use extract::{getvar, CombineMethod, TimeIndex};
pub use loader::{find_wrf_files, load_all_wrf, load_all_wrf_with, load_one_wrf, load_one_wrf_at};
pub use metadata::{available_diagnostics, list_variables, print_inventory};
pub use netcdf_io::{write_array_to_netcdf, NetCDFWriter};
pub use parallel::{get_parallel_info, ParallelConfig};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::data_array::WrfDataArray;
    pub use crate::errors::{Result, WrfError};
    pub use crate::extract::{CombineMethod, TimeIndex};
    pub use crate::loader::{load_all_wrf, load_one_wrf};
}
