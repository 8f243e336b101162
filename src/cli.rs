//! Defines command-line interface options using `clap` for the wrf_loader tool.

use clap::{ArgGroup, Parser};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::PathBuf;
use std::str::FromStr;
use wrf_loader::{CombineMethod, TimeIndex};

/// A CLI tool for loading variables from WRF output
#[derive(Parser, Debug)]
#[command(
    version,
    name = "wrf_loader",
    about = "Load variables and diagnostics from WRF output files"
)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "folder"])))]
pub struct Args {
    /// Path to a single WRF output file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Folder whose wrfout* files are combined over time
    #[arg(short = 'd', long)]
    pub folder: Option<PathBuf>,

    /// Variable or diagnostic to load (e.g. T2, slp, tk). If not set, lists the file contents.
    #[arg(long = "var")]
    pub var: Option<String>,

    /// Keep only this time index of the combined sequence; negative values count from the end
    #[arg(long, allow_negative_numbers = true)]
    pub time_index: Option<isize>,

    /// How files in a folder are combined: 'cat' along Time or 'join' along a new file dimension
    #[arg(long, default_value = "cat", value_parser = parse_method_arg)]
    pub method: CombineMethod,

    /// Path to save the loaded array as NetCDF. If not set, prints a summary.
    #[arg(long)]
    pub output_netcdf: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Number of threads to use for diagnostics. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,
}

/// Where the data comes from
#[derive(Debug, Clone)]
pub enum Source {
    File(PathBuf),
    Folder(PathBuf),
}

impl Args {
    /// The `source` group makes exactly one of `--file` and `--folder` present.
    pub fn source(&self) -> Source {
        match (&self.file, &self.folder) {
            (Some(file), _) => Source::File(file.clone()),
            (None, folder) => Source::Folder(folder.clone().unwrap_or_default()),
        }
    }

    pub fn time_selection(&self) -> TimeIndex {
        self.time_index.map_or(TimeIndex::All, TimeIndex::Single)
    }
}

fn parse_method_arg(s: &str) -> Result<CombineMethod, String> {
    CombineMethod::from_str(s)
}
