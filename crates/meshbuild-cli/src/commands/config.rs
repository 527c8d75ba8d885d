//! Config command - print the CRD extraction config for a mesh version

use meshbuild_core::ExtractionConfig;

use crate::display;
use crate::error::{CliError, Result};

/// Output format for structured data
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Yaml,
    Json,
}

pub fn run(mesh_name: &str, mesh_version: &str, format: OutputFormat) -> Result<()> {
    let config = ExtractionConfig::new(mesh_name, mesh_version);

    match format {
        OutputFormat::Table => display::print_extraction_config(&config),
        OutputFormat::Yaml => {
            let yaml =
                serde_yaml::to_string(&config).map_err(|e| CliError::internal(e.to_string()))?;
            print!("{}", yaml);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config)
                .map_err(|e| CliError::internal(e.to_string()))?;
            println!("{}", json);
        }
    }

    Ok(())
}
