//! Centralized error handling for wrf_loader
//!
//! Every fallible operation in the crate returns [`Result`], so callers can
//! match on the specific failure (missing path, no `wrfout*` files, unknown
//! variable) instead of inspecting strings.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for wrf_loader operations
#[derive(Debug, Error)]
pub enum WrfError {
    /// NetCDF library error
    #[error("NetCDF error: {0}")]
    NetCDFError(#[from] netcdf::Error),

    /// I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Array shape or dimension error
    #[error("Array error: {0}")]
    ArrayError(#[from] ndarray::ShapeError),

    /// A single WRF file that does not exist
    #[error("File {} not found", path.display())]
    FileNotFound { path: PathBuf },

    /// A run directory that does not exist or is not a directory
    #[error("Folder {} not found", path.display())]
    FolderNotFound { path: PathBuf },

    /// The run directory exists but holds no `wrfout*` files
    #[error("No NetCDF files found in folder {}", folder.display())]
    NoWrfFiles { folder: PathBuf },

    /// Neither a known diagnostic nor a variable present in the file
    #[error("Variable '{var}' not found in file")]
    VariableNotFound { var: String },

    /// Dimension not found in variable
    #[error("Dimension '{dim}' not found in variable '{var}'")]
    DimensionNotFound { var: String, dim: String },

    /// Requested time index is outside the available times
    #[error("Time index {index} is out of range for {available} available times")]
    InvalidTimeIndex { index: isize, available: usize },

    /// Files (or arrays) that cannot be combined into one array
    #[error("Cannot combine arrays: {message}")]
    IncompatibleFiles { message: String },

    /// Data and dimension labels that do not agree
    #[error("Shape mismatch: {message}")]
    ShapeMismatch { message: String },

    /// The `Times` variable could not be decoded
    #[error("Invalid WRF time string '{value}'")]
    InvalidTime { value: String },

    /// Thread pool configuration error
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    /// JSON serialisation of a summary failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for wrf_loader operations
pub type Result<T> = std::result::Result<T, WrfError>;
