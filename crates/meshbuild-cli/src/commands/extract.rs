//! Extract command - apply the extraction config to a rendered manifest

use meshbuild_core::{ExtractionConfig, SplitStrategy};
use std::path::Path;

use crate::display;
use crate::error::{CliError, Result};

pub fn run(
    manifest: &Path,
    mesh_name: &str,
    mesh_version: &str,
    marker_split: bool,
    json_output: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(manifest).map_err(|e| CliError::Io {
        message: format!("{}: {}", manifest.display(), e),
    })?;

    let mut config = ExtractionConfig::new(mesh_name, mesh_version);
    if marker_split {
        config = config.with_split(SplitStrategy::DocumentMarker);
    }

    let resources = config.extract_all(&content)?;
    tracing::debug!(count = resources.len(), "extracted resource definitions");

    if json_output {
        let json = serde_json::to_string_pretty(&resources)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", json);
    } else {
        display::print_resources(&resources);
    }

    Ok(())
}
