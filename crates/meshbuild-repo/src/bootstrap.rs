//! Build initialization
//!
//! Runs once at startup: load metadata, find the newest chart archive, look up
//! the application version it packages and derive everything downstream
//! generation needs. Failures are logged and recorded on the returned
//! [`BuildInfo`]; they never abort the process. When version resolution fails,
//! no version-dependent field is populated.

use meshbuild_core::{ErrorKind, ExtractionConfig, MeshModelConfig, load_metadata};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::error::Result;
use crate::registry::{ChartRegistry, HttpChartRegistry};
use crate::resolver::resolve_latest_version;
use crate::walker::{GitHubTree, RemoteTree};

/// How component definitions were generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GenerationMethod {
    #[serde(rename = "HELM_CHARTS")]
    HelmCharts,
}

impl GenerationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMethod::HelmCharts => "HELM_CHARTS",
        }
    }
}

impl std::fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State derived from a successfully resolved chart version
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBuild {
    /// Newest chart version found in the source tree
    pub chart_version: String,

    /// Application version packaged by that chart
    pub app_version: String,

    /// Where the chart archive can be downloaded
    pub generation_url: String,

    pub generation_method: GenerationMethod,

    pub workload_path: PathBuf,

    pub mesh_model_path: PathBuf,

    pub extraction: ExtractionConfig,
}

/// A non-fatal initialization failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildFailure {
    pub kind: ErrorKind,
    pub message: String,
}

/// Immutable result of build initialization
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub model: MeshModelConfig,

    /// `None` when the chart version could not be resolved or translated
    pub resolved: Option<ResolvedBuild>,

    /// Failures encountered, in order
    pub failures: Vec<BuildFailure>,
}

impl BuildInfo {
    /// Application version to target, if resolved
    pub fn default_version(&self) -> Option<&str> {
        self.resolved.as_ref().map(|r| r.app_version.as_str())
    }

    pub fn generation_url(&self) -> Option<&str> {
        self.resolved.as_ref().map(|r| r.generation_url.as_str())
    }

    pub fn generation_method(&self) -> Option<GenerationMethod> {
        self.resolved.as_ref().map(|r| r.generation_method)
    }

    pub fn extraction(&self) -> Option<&ExtractionConfig> {
        self.resolved.as_ref().map(|r| &r.extraction)
    }

    pub fn is_complete(&self) -> bool {
        self.resolved.is_some()
    }
}

fn failure(kind: ErrorKind, message: String) -> BuildFailure {
    tracing::warn!(kind = %kind, "{}", message);
    BuildFailure { kind, message }
}

/// Initialize with the given collaborators.
///
/// Relative paths in `config` are taken relative to `work_dir`.
pub async fn bootstrap(
    config: &BuildConfig,
    tree: &dyn RemoteTree,
    registry: &dyn ChartRegistry,
    work_dir: &Path,
) -> BuildInfo {
    let mut failures = Vec::new();

    let metadata = match load_metadata(&work_dir.join(&config.metadata_path)) {
        Ok(metadata) => metadata,
        Err(e) => {
            failures.push(failure(ErrorKind::MetadataLoadFailure, e.to_string()));
            Default::default()
        }
    };
    let model = MeshModelConfig::new(metadata);

    let chart_version =
        match resolve_latest_version(tree, &config.naming, config.listing_timeout()).await {
            Ok(version) => version,
            Err(e) => {
                failures.push(failure(
                    e.kind(),
                    format!("could not get chart version: {}", e),
                ));
                return BuildInfo {
                    model,
                    resolved: None,
                    failures,
                };
            }
        };

    let app_version = match registry
        .app_version(&config.chart.repo_url, &config.chart.name, &chart_version)
        .await
    {
        Ok(version) => version,
        Err(e) => {
            failures.push(failure(
                ErrorKind::TranslationFailure,
                format!("could not get version: {}", e),
            ));
            return BuildInfo {
                model,
                resolved: None,
                failures,
            };
        }
    };

    tracing::info!(
        chart_version = %chart_version,
        app_version = %app_version,
        "build initialized"
    );

    let resolved = ResolvedBuild {
        generation_url: config.generation_url(&chart_version),
        generation_method: GenerationMethod::HelmCharts,
        workload_path: config.workload_path.clone(),
        mesh_model_path: work_dir.join(&config.mesh_model_path),
        extraction: ExtractionConfig::new(&config.mesh_name, &app_version),
        chart_version,
        app_version,
    };

    BuildInfo {
        model,
        resolved: Some(resolved),
        failures,
    }
}

/// Initialize against the configured GitHub tree and Helm repository.
///
/// Only fails if the HTTP client cannot be constructed.
pub async fn bootstrap_remote(config: &BuildConfig, work_dir: &Path) -> Result<BuildInfo> {
    let client = config.http_client()?;
    let tree = GitHubTree::new(config.source.clone(), client.clone());
    let registry = HttpChartRegistry::new(client);
    Ok(bootstrap(config, &tree, &registry, work_dir).await)
}
