//! CRD extraction configuration
//!
//! An [`ExtractionConfig`] describes how to turn the rendered output of a chart
//! into individual CustomResourceDefinition documents and which fields of each
//! document identify the resource. It is plain data: the paths are resolved by
//! [`ExtractionConfig::extract`] or by any other consumer that understands the
//! dot/index notation in [`crate::path`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::path::PathExpr;

/// Mesh name used in generated components
pub const NGINX_SERVICE_MESH: &str = "NGINX_SERVICE_MESH";

/// Literal separator between documents in a rendered manifest
pub const DOCUMENT_SEPARATOR: &str = "---";

/// How a combined manifest is split into documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "strategy", content = "token")]
pub enum SplitStrategy {
    /// Split on every occurrence of the token, wherever it appears.
    ///
    /// A token inside a quoted scalar also splits. Fragments are returned
    /// untrimmed and may be blank.
    Separator(String),

    /// Split only on lines that consist of `---` alone (ignoring trailing
    /// whitespace). Opt-in; not used by [`ExtractionConfig::new`].
    DocumentMarker,
}

impl SplitStrategy {
    pub fn split<'a>(&self, manifest: &'a str) -> Vec<&'a str> {
        match self {
            SplitStrategy::Separator(token) => manifest.split(token.as_str()).collect(),
            SplitStrategy::DocumentMarker => split_on_marker_lines(manifest),
        }
    }
}

fn split_on_marker_lines(manifest: &str) -> Vec<&str> {
    let mut docs = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in manifest.split_inclusive('\n') {
        let end = offset + line.len();
        if line.trim_end() == DOCUMENT_SEPARATOR {
            docs.push(&manifest[start..offset]);
            start = end;
        }
        offset = end;
    }
    docs.push(&manifest[start..]);
    docs
}

/// Paths to the identifying fields of a resource definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractorPaths {
    pub name_path: String,
    pub id_path: String,
    pub version_path: String,
    pub group_path: String,
    pub spec_path: String,
}

impl Default for ExtractorPaths {
    /// Paths for `apiextensions.k8s.io/v1` CRDs: kind under `spec.names`, the
    /// first served version, and the schema of that version's `spec` property.
    fn default() -> Self {
        Self {
            name_path: "spec.names.kind".to_string(),
            id_path: "spec.names.kind".to_string(),
            version_path: "spec.versions[0].name".to_string(),
            group_path: "spec.group".to_string(),
            spec_path: "spec.versions[0].schema.openAPIV3Schema.properties.spec".to_string(),
        }
    }
}

impl ExtractorPaths {
    /// Logical field name to path, in a fixed order
    pub fn as_map(&self) -> IndexMap<&'static str, &str> {
        IndexMap::from([
            ("name", self.name_path.as_str()),
            ("id", self.id_path.as_str()),
            ("version", self.version_path.as_str()),
            ("group", self.group_path.as_str()),
            ("spec", self.spec_path.as_str()),
        ])
    }
}

/// Paths plus matching mode used to pick fields out of each CRD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdFilter {
    pub paths: ExtractorPaths,
    pub case_sensitive: bool,
}

impl CrdFilter {
    pub fn new(paths: ExtractorPaths, case_sensitive: bool) -> Self {
        Self {
            paths,
            case_sensitive,
        }
    }
}

/// Fields extracted from one resource definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedResource {
    pub name: String,
    pub id: String,
    pub version: String,
    pub group: String,
    pub spec: Value,
}

/// Immutable description of how to extract CRDs for one mesh version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionConfig {
    pub mesh_name: String,
    pub mesh_version: String,
    pub split: SplitStrategy,
    pub crd_filter: CrdFilter,
}

impl ExtractionConfig {
    /// Build the configuration for a mesh version. Always succeeds.
    ///
    /// Path matching is case-insensitive; upstream CRDs are not consistent
    /// about key casing.
    pub fn new(mesh_name: impl Into<String>, mesh_version: impl Into<String>) -> Self {
        Self {
            mesh_name: mesh_name.into(),
            mesh_version: mesh_version.into(),
            split: SplitStrategy::Separator(DOCUMENT_SEPARATOR.to_string()),
            crd_filter: CrdFilter::new(ExtractorPaths::default(), false),
        }
    }

    /// Configuration for NGINX Service Mesh
    pub fn nginx(mesh_version: impl Into<String>) -> Self {
        Self::new(NGINX_SERVICE_MESH, mesh_version)
    }

    /// Replace the split strategy
    pub fn with_split(mut self, split: SplitStrategy) -> Self {
        self.split = split;
        self
    }

    pub fn field_paths(&self) -> IndexMap<&'static str, &str> {
        self.crd_filter.paths.as_map()
    }

    pub fn case_sensitive(&self) -> bool {
        self.crd_filter.case_sensitive
    }

    /// Split a rendered manifest into raw documents. Blank fragments are kept.
    pub fn split_documents<'a>(&self, manifest: &'a str) -> Vec<&'a str> {
        self.split.split(manifest)
    }

    /// Resolve the configured paths against one YAML document
    pub fn extract(&self, document: &str) -> Result<ExtractedResource> {
        let doc: Value = serde_yaml::from_str(document)?;
        self.extract_value(&doc)
    }

    /// Resolve the configured paths against an already parsed document
    pub fn extract_value(&self, doc: &Value) -> Result<ExtractedResource> {
        let paths = &self.crd_filter.paths;
        Ok(ExtractedResource {
            name: self.string_at("name", &paths.name_path, doc)?,
            id: self.string_at("id", &paths.id_path, doc)?,
            version: self.string_at("version", &paths.version_path, doc)?,
            group: self.string_at("group", &paths.group_path, doc)?,
            spec: self.value_at(&paths.spec_path, doc)?.clone(),
        })
    }

    /// Split `manifest` and extract every resource definition in it.
    ///
    /// Blank fragments and documents whose name path does not resolve are
    /// skipped. A resource definition missing one of the other fields is
    /// skipped with a warning. A fragment that is not valid YAML aborts the
    /// extraction.
    pub fn extract_all(&self, manifest: &str) -> Result<Vec<ExtractedResource>> {
        let name_path = PathExpr::parse(&self.crd_filter.paths.name_path)?;
        let mut resources = Vec::new();

        for (idx, fragment) in self.split_documents(manifest).into_iter().enumerate() {
            if fragment.trim().is_empty() {
                continue;
            }

            let doc: Value = serde_yaml::from_str(fragment)?;
            if doc.is_null() {
                continue;
            }
            if name_path.resolve(&doc, self.case_sensitive()).is_none() {
                tracing::debug!(document = idx, "skipping document without {}", name_path);
                continue;
            }

            match self.extract_value(&doc) {
                Ok(resource) => resources.push(resource),
                Err(e) => tracing::warn!(document = idx, error = %e, "skipping resource definition"),
            }
        }

        Ok(resources)
    }

    fn value_at<'a>(&self, expr: &str, doc: &'a Value) -> Result<&'a Value> {
        PathExpr::parse(expr)?
            .resolve(doc, self.case_sensitive())
            .ok_or_else(|| CoreError::PathNotFound {
                expr: expr.to_string(),
            })
    }

    fn string_at(&self, field: &str, expr: &str, doc: &Value) -> Result<String> {
        self.value_at(expr, doc)?
            .as_str()
            .map(String::from)
            .ok_or_else(|| CoreError::NotAString {
                field: field.to_string(),
                expr: expr.to_string(),
            })
    }
}
