//! Helm repository index
//!
//! Only the fields needed to map a chart version to its application version
//! (plus a little provenance for display) are modelled; unknown keys are
//! ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{RepoError, Result};

/// Repository index (`index.yaml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryIndex {
    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(default)]
    pub generated: Option<DateTime<Utc>>,

    /// Chart versions keyed by chart name
    #[serde(default)]
    pub entries: HashMap<String, Vec<ChartEntry>>,
}

impl RepositoryIndex {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| RepoError::IndexParseError {
            message: e.to_string(),
        })
    }

    /// All published versions of a chart
    pub fn get(&self, name: &str) -> Option<&Vec<ChartEntry>> {
        self.entries.get(name)
    }

    /// A specific version of a chart. A leading `v` on either side is ignored,
    /// as Helm does when looking up versions.
    pub fn get_version(&self, name: &str, version: &str) -> Option<&ChartEntry> {
        let wanted = version.trim_start_matches('v');
        self.entries
            .get(name)?
            .iter()
            .find(|e| e.version.trim_start_matches('v') == wanted)
    }
}

/// One chart version in the index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    pub name: String,

    /// Chart version
    pub version: String,

    /// Version of the packaged application
    #[serde(default)]
    pub app_version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Archive download URLs
    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default)]
    pub digest: Option<String>,

    #[serde(default)]
    pub created: Option<DateTime<Utc>>,

    #[serde(default)]
    pub deprecated: bool,
}
