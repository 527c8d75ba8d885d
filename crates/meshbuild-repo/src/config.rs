//! Build configuration
//!
//! Defaults describe the NGINX Service Mesh chart as published in
//! `nginxinc/helm-charts`. A YAML file may override any subset of fields.

use meshbuild_core::{BundleNaming, DEFAULT_METADATA_PATH, NGINX_SERVICE_MESH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{RepoError, Result};
use crate::http::HttpClient;

/// Placeholder substituted in [`BuildConfig::generation_url_template`]
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Everything the bootstrap needs to know about where the chart lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    /// Name the generated components are registered under
    pub mesh_name: String,

    /// Where chart archives are listed
    pub source: SourceConfig,

    /// Archive naming convention inside `source`
    pub naming: BundleNaming,

    /// Helm repository used for the appVersion lookup
    pub chart: ChartConfig,

    /// Download URL pattern containing `{version}`
    pub generation_url_template: String,

    /// Static metadata JSON, relative to the working directory
    pub metadata_path: PathBuf,

    /// OAM workload definitions, relative to the working directory
    pub workload_path: PathBuf,

    /// Generated component output, relative to the working directory
    pub mesh_model_path: PathBuf,

    /// Upper bound on the remote listing, in seconds (0 = unbounded)
    pub timeout_secs: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            mesh_name: NGINX_SERVICE_MESH.to_string(),
            source: SourceConfig::default(),
            naming: BundleNaming::default(),
            chart: ChartConfig::default(),
            generation_url_template:
                "https://github.com/nginxinc/helm-charts/blob/master/stable/nginx-service-mesh-{version}.tgz?raw=true"
                    .to_string(),
            metadata_path: PathBuf::from(DEFAULT_METADATA_PATH),
            workload_path: Path::new("templates").join("oam").join("workloads"),
            mesh_model_path: Path::new("templates").join("meshmodel").join("components"),
            timeout_secs: 60,
        }
    }
}

impl BuildConfig {
    /// Load configuration from a YAML file; missing fields take defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.generation_url_template.contains(VERSION_PLACEHOLDER) {
            return Err(RepoError::InvalidConfig {
                message: format!(
                    "generationUrlTemplate must contain {}",
                    VERSION_PLACEHOLDER
                ),
            });
        }
        if self.naming.prefix.is_empty() {
            return Err(RepoError::InvalidConfig {
                message: "naming.prefix must not be empty".to_string(),
            });
        }
        url::Url::parse(&self.source.api_url).map_err(|e| RepoError::InvalidUrl {
            url: self.source.api_url.clone(),
            reason: e.to_string(),
        })?;
        url::Url::parse(&self.chart.repo_url).map_err(|e| RepoError::InvalidUrl {
            url: self.chart.repo_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Download URL for a chart version
    pub fn generation_url(&self, version: &str) -> String {
        self.generation_url_template
            .replace(VERSION_PLACEHOLDER, version)
    }

    /// Deadline for the remote listing
    pub fn listing_timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// HTTP client carrying the source token, if one is configured
    pub fn http_client(&self) -> Result<HttpClient> {
        HttpClient::new(self.source.token(), Duration::from_secs(30))
    }
}

/// A directory in a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceConfig {
    /// GitHub API base URL
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,

    /// Directory to list, relative to the repository root
    pub root: String,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Environment variable holding an API token
    pub token_env: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            owner: "nginxinc".to_string(),
            repo: "helm-charts".to_string(),
            branch: "master".to_string(),
            root: "stable/".to_string(),
            recursive: false,
            token_env: Some("GITHUB_TOKEN".to_string()),
        }
    }
}

impl SourceConfig {
    /// Token from the configured environment variable, if set and non-empty
    pub fn token(&self) -> Option<String> {
        let var = self.token_env.as_deref()?;
        std::env::var(var).ok().filter(|t| !t.is_empty())
    }
}

/// Helm repository and chart name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    pub repo_url: String,
    pub name: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            repo_url: "https://helm.nginx.com/stable".to_string(),
            name: "nginx-service-mesh".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = BuildConfig::default();
        config.validate().unwrap();
        assert_eq!(config.mesh_name, "NGINX_SERVICE_MESH");
        assert_eq!(config.naming.prefix, "nginx-service-mesh-");
        assert_eq!(config.chart.name, "nginx-service-mesh");
        assert_eq!(config.listing_timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_generation_url() {
        let url = BuildConfig::default().generation_url("0.7.0");
        insta::assert_snapshot!(url, @"https://github.com/nginxinc/helm-charts/blob/master/stable/nginx-service-mesh-0.7.0.tgz?raw=true");
    }

    #[test]
    fn test_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "source:\n  branch: main\n  recursive: true\ntimeoutSecs: 0\nchart:\n  repoUrl: https://charts.example.com"
        )
        .unwrap();

        let config = BuildConfig::load_from(file.path()).unwrap();
        assert_eq!(config.source.branch, "main");
        assert_eq!(config.source.owner, "nginxinc");
        assert!(config.source.recursive);
        assert_eq!(config.chart.repo_url, "https://charts.example.com");
        assert_eq!(config.chart.name, "nginx-service-mesh");
        assert_eq!(config.listing_timeout(), None);
    }

    #[test]
    fn test_invalid_template() {
        let config = BuildConfig {
            generation_url_template: "https://example.com/chart.tgz".to_string(),
            ..BuildConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RepoError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = BuildConfig::default();
        config.chart.repo_url = "helm.nginx.com".to_string();
        assert!(matches!(config.validate(), Err(RepoError::InvalidUrl { .. })));
    }

    #[test]
    fn test_token_env_unset() {
        let source = SourceConfig {
            token_env: Some("MESHBUILD_TEST_TOKEN_THAT_IS_NOT_SET".to_string()),
            ..SourceConfig::default()
        };
        assert_eq!(source.token(), None);

        let source = SourceConfig {
            token_env: None,
            ..SourceConfig::default()
        };
        assert_eq!(source.token(), None);
    }
}
