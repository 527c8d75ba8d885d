//! Core error types

use serde::Serialize;
use thiserror::Error;

/// Coarse failure classes reported during build initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// No bundle archive matched the naming convention
    NotFound,
    /// The remote listing could not be completed
    TransportFailure,
    /// Chart version could not be translated to an application version
    TranslationFailure,
    /// The static metadata file is missing or corrupt (non-fatal)
    MetadataLoadFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::TransportFailure => "transport failure",
            ErrorKind::TranslationFailure => "translation failure",
            ErrorKind::MetadataLoadFailure => "metadata load failure",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("no files found matching {prefix}*{suffix}")]
    NoBundlesFound { prefix: String, suffix: String },

    #[error("Invalid bundle version '{token}': {reason}")]
    InvalidVersion { token: String, reason: String },

    #[error("Invalid path expression '{expr}': {reason}")]
    InvalidPath { expr: String, reason: String },

    #[error("Path '{expr}' did not resolve in document")]
    PathNotFound { expr: String },

    #[error("Field '{field}' at '{expr}' is not a string")]
    NotAString { field: String, expr: String },

    #[error("Failed to load metadata from {path}: {message}")]
    MetadataLoad { path: String, message: String },

    #[error("Failed to parse YAML document: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Map this error onto the initialization failure taxonomy.
    ///
    /// Extraction errors happen after initialization and have no kind.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            CoreError::NoBundlesFound { .. } | CoreError::InvalidVersion { .. } => {
                Some(ErrorKind::NotFound)
            }
            CoreError::MetadataLoad { .. } => Some(ErrorKind::MetadataLoadFailure),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = CoreError::NoBundlesFound {
            prefix: "nginx-service-mesh-".to_string(),
            suffix: ".tgz".to_string(),
        };
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
        assert!(err.to_string().starts_with("no files found"));

        let err = CoreError::MetadataLoad {
            path: "build/meshmodel_metadata.json".to_string(),
            message: "missing".to_string(),
        };
        assert_eq!(err.kind(), Some(ErrorKind::MetadataLoadFailure));

        let err = CoreError::PathNotFound {
            expr: "spec.group".to_string(),
        };
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::TransportFailure.to_string(), "transport failure");
        assert_eq!(
            serde_json::to_string(&ErrorKind::TranslationFailure).unwrap(),
            "\"TRANSLATION_FAILURE\""
        );
    }
}
