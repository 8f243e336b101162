//! WRF file inspection
//!
//! Lists the raw variables of a file and the diagnostics that can be computed
//! from them, so users can find out what to pass to the loaders.

use crate::diagnostics::Diagnostic;
use crate::errors::Result;
use crate::times::{format_wrf_time, read_times};
use netcdf::{AttributeValue, File};

/// Description of one raw variable
#[derive(Debug, Clone)]
pub struct VariableMetadata {
    pub name: String,
    pub data_type: String,
    pub dimensions: Vec<DimensionInfo>,
    pub units: Option<String>,
    pub description: Option<String>,
}

/// Information about a dimension
#[derive(Debug, Clone)]
pub struct DimensionInfo {
    pub name: String,
    pub length: usize,
    pub is_unlimited: bool,
}

impl VariableMetadata {
    pub fn shape(&self) -> Vec<usize> {
        self.dimensions.iter().map(|d| d.length).collect()
    }
}

/// Describe every variable of a file, sorted by name.
pub fn list_variables(file: &File) -> Vec<VariableMetadata> {
    let mut variables: Vec<VariableMetadata> = file
        .variables()
        .map(|var| VariableMetadata {
            name: var.name().to_string(),
            data_type: format!("{:?}", var.vartype()).to_lowercase(),
            dimensions: var
                .dimensions()
                .iter()
                .map(|d| DimensionInfo {
                    name: d.name().to_string(),
                    length: d.len(),
                    is_unlimited: d.is_unlimited(),
                })
                .collect(),
            units: string_attribute(&var, "units"),
            description: string_attribute(&var, "description"),
        })
        .collect();

    variables.sort_by(|a, b| a.name.cmp(&b.name));
    variables
}

/// Diagnostics whose inputs are all present in `file`
pub fn available_diagnostics(file: &File) -> Vec<Diagnostic> {
    Diagnostic::ALL
        .into_iter()
        .filter(|diag| diag.is_available(file))
        .collect()
}

/// Print dimensions, valid times, variables and computable diagnostics.
pub fn print_inventory(file: &File) -> Result<()> {
    println!("\n Dimensions");
    println!("==============");

    let mut dimensions: Vec<_> = file.dimensions().collect();
    dimensions.sort_by_key(|d| d.name().to_string());

    if dimensions.is_empty() {
        println!("   (No dimensions found)");
    }
    for dim in dimensions {
        let length_info = if dim.is_unlimited() {
            format!("{} (unlimited)", dim.len())
        } else {
            dim.len().to_string()
        };
        println!("    {} = {}", dim.name(), length_info);
    }

    let times = read_times(file)?;
    if let (Some(first), Some(last)) = (times.first(), times.last()) {
        println!("\n Valid times");
        println!("===============");
        println!(
            "    {} time(s): {} to {}",
            times.len(),
            format_wrf_time(first),
            format_wrf_time(last)
        );
    }

    println!("\n Variables");
    println!("=============");

    let variables = list_variables(file);
    if variables.is_empty() {
        println!("   (No variables found)");
    }
    for var in &variables {
        let dims: Vec<&str> = var.dimensions.iter().map(|d| d.name.as_str()).collect();
        let shape: Vec<String> = var.shape().iter().map(ToString::to_string).collect();

        if dims.is_empty() {
            println!("    {} ({}): scalar", var.name, var.data_type);
        } else {
            println!(
                "    {} ({}): [{}] = ({})",
                var.name,
                var.data_type,
                dims.join(", "),
                shape.join(" x ")
            );
        }

        let mut key_attrs = Vec::new();
        if let Some(description) = &var.description {
            key_attrs.push(description.clone());
        }
        if let Some(units) = var.units.as_ref().filter(|u| !u.is_empty()) {
            key_attrs.push(format!("units: {units}"));
        }
        if !key_attrs.is_empty() {
            println!("      - {}", key_attrs.join(", "));
        }
    }

    println!("\n Diagnostics");
    println!("===============");

    let diagnostics = available_diagnostics(file);
    if diagnostics.is_empty() {
        println!("   (No diagnostics can be computed from this file)");
    }
    for diag in diagnostics {
        println!(
            "    {} ({}): {}",
            diag.name(),
            diag.units(),
            diag.description()
        );
    }

    println!("\nTip: Use --var <name> to load a variable or diagnostic");

    Ok(())
}

fn string_attribute(var: &netcdf::Variable, name: &str) -> Option<String> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Str(value) => Some(value),
        _ => None,
    }
}
