//! Resolve command - run build initialization and report the result

use meshbuild_repo::{BuildConfig, bootstrap_remote};
use std::path::Path;

use crate::display;
use crate::error::{CliError, Result};

/// Initialization failures are printed, never turned into an error exit
pub async fn run(config: &BuildConfig, work_dir: &Path, json_output: bool) -> Result<()> {
    let info = bootstrap_remote(config, work_dir).await?;

    if json_output {
        let json = serde_json::to_string_pretty(&info)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", json);
    } else {
        display::print_build_info(&info);
    }

    Ok(())
}
