//! Versions command - list every chart version found in the source tree

use console::style;
use meshbuild_repo::{BuildConfig, GitHubTree, list_versions};

use crate::error::{CliError, Result};

pub async fn run(config: &BuildConfig, json_output: bool) -> Result<()> {
    let tree = GitHubTree::new(config.source.clone(), config.http_client()?);
    let versions = list_versions(&tree, &config.naming, config.listing_timeout()).await?;

    if json_output {
        let names: Vec<_> = versions.iter().map(|v| v.as_str()).collect();
        let json = serde_json::to_string_pretty(&names)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    if versions.is_empty() {
        println!(
            "No archives matching {} found",
            config.naming.file_name("<version>")
        );
        return Ok(());
    }

    let latest = versions.len() - 1;
    for (idx, version) in versions.iter().enumerate() {
        if idx == latest {
            println!("{} {}", style(version).green().bold(), style("(latest)").dim());
        } else {
            println!("{}", version);
        }
    }

    Ok(())
}
