//! Entry point for the wrf_loader command line tool.
//! Parses arguments, loads the requested variable from a file or run folder and
//! prints a summary, writes it to NetCDF, or lists what a file contains.

use clap::Parser;
use log::info;
use std::path::PathBuf;

mod cli;
mod logging;

use cli::{Args, Source};
use logging::init_logging;
use wrf_loader::{
    find_wrf_files, get_parallel_info, load_all_wrf_with, load_one_wrf_at, print_inventory,
    write_array_to_netcdf, ArraySummary, ParallelConfig, WrfDataArray,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter());

    ParallelConfig::new(args.threads).setup_global_pool()?;
    get_parallel_info().log_info();

    let source = args.source();

    let Some(varname) = args.var.as_deref() else {
        let path = inventory_path(&source)?;
        let file = netcdf::open(&path)?;
        println!("Contents of {}", path.display());
        print_inventory(&file)?;
        return Ok(());
    };

    let array = match &source {
        Source::File(path) => load_one_wrf_at(path, varname, args.time_selection())?,
        Source::Folder(folder) => {
            load_all_wrf_with(folder, varname, args.time_selection(), args.method)?
        }
    };
    info!("Loaded '{}' with shape {:?}", array.name, array.shape());

    if let Some(output_path) = &args.output_netcdf {
        write_array_to_netcdf(&array, output_path)?;
        println!("Saved '{}' to {}", array.name, output_path.display());
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&array.summary())?);
    } else {
        print_summary(&array, &array.summary());
    }

    Ok(())
}

/// File whose contents are listed when no variable is requested
fn inventory_path(source: &Source) -> wrf_loader::Result<PathBuf> {
    match source {
        Source::File(path) => Ok(path.clone()),
        Source::Folder(folder) => {
            let mut files = find_wrf_files(folder)?;
            Ok(files.swap_remove(0))
        }
    }
}

fn print_summary(array: &WrfDataArray, summary: &ArraySummary) {
    println!("\n Variable: {}", summary.name);
    println!("={}", "=".repeat(summary.name.len() + 11));

    if let Some(description) = &summary.description {
        println!(" Description: {}", description);
    }
    if let Some(units) = &summary.units {
        println!(" Units: {}", units);
    }

    let shape: Vec<String> = summary.shape.iter().map(ToString::to_string).collect();
    println!(" Dimensions: [{}]", summary.dims.join(", "));
    println!(" Shape: ({})", shape.join(" x "));

    match (&summary.first_time, &summary.last_time) {
        (Some(first), Some(last)) if array.times.len() > 1 => {
            println!(" Times: {} to {} ({} steps)", first, last, array.times.len())
        }
        (Some(first), _) => println!(" Time: {}", first),
        _ => {}
    }

    println!(
        "\n Valid elements: {} / {}",
        summary.valid_count, summary.total_count
    );
    if let (Some(min), Some(max), Some(mean)) = (summary.min, summary.max, summary.mean) {
        println!("    Min: {:.2}", min);
        println!("    Max: {:.2}", max);
        println!("    Mean: {:.2}", mean);
    } else {
        println!("\n No valid (finite) data found");
    }
}
