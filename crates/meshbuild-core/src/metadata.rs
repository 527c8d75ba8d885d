//! Mesh model metadata
//!
//! The adapter ships a JSON file (logos, colors, display names) that is
//! attached verbatim to every generated component. Its content is opaque here.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{CoreError, Result};

/// Default location of the metadata file, relative to the working directory
pub const DEFAULT_METADATA_PATH: &str = "build/meshmodel_metadata.json";

pub type Metadata = Map<String, Value>;

/// Load the metadata object from disk
pub fn load_metadata(path: &Path) -> Result<Metadata> {
    let load_err = |message: String| CoreError::MetadataLoad {
        path: path.display().to_string(),
        message,
    };

    let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| load_err(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(load_err(format!(
            "expected a JSON object, found {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Classification and metadata shared by all generated components
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshModelConfig {
    pub category: String,
    pub sub_category: String,
    pub metadata: Metadata,
}

impl MeshModelConfig {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            category: "Orchestration & Management".to_string(),
            sub_category: "Service Mesh".to_string(),
            metadata,
        }
    }
}

impl Default for MeshModelConfig {
    fn default() -> Self {
        Self::new(Metadata::new())
    }
}
