//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use meshbuild_core::CoreError;
use meshbuild_repo::RepoError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Build configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    #[diagnostic(code(meshbuild::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A manifest could not be split or a field path did not resolve
    #[error("Extraction failed: {message}")]
    #[diagnostic(code(meshbuild::cli::extract))]
    Extraction {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Remote listing or registry lookup failed
    #[error("Remote error: {message}")]
    #[diagnostic(code(meshbuild::cli::remote))]
    Remote { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(meshbuild::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(meshbuild::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Extraction { .. } => exit_codes::EXTRACTION_ERROR,
            CliError::Remote { .. } => exit_codes::REMOTE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let help = match &err {
            CoreError::PathNotFound { .. } | CoreError::NotAString { .. } => {
                Some("The document does not have the CustomResourceDefinition shape".to_string())
            }
            CoreError::YamlParse(_) => Some(
                "Documents are split on every '---'; a separator inside a string breaks the document. Try --marker-split"
                    .to_string(),
            ),
            _ => None,
        };
        CliError::Extraction {
            message: err.to_string(),
            help,
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::InvalidConfig { .. } | RepoError::InvalidUrl { .. } => CliError::Config {
                message: err.to_string(),
                help: None,
            },
            RepoError::ConfigParse { message } => CliError::Config {
                message,
                help: Some("Check the YAML syntax of the --config file".to_string()),
            },
            RepoError::Io(e) => e.into(),
            RepoError::Core(e) => e.into(),
            other => CliError::Remote {
                message: other.to_string(),
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err: CliError = RepoError::InvalidConfig {
            message: "bad".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);

        let err: CliError = RepoError::Timeout { seconds: 5 }.into();
        assert_eq!(err.exit_code(), exit_codes::REMOTE_ERROR);

        let err: CliError = CoreError::PathNotFound {
            expr: "spec.group".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_codes::EXTRACTION_ERROR);

        let err: CliError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.exit_code(), exit_codes::IO_ERROR);

        assert_eq!(CliError::internal("x").exit_code(), exit_codes::ERROR);
    }

    #[test]
    fn test_undecodable_listing_is_remote_error() {
        let err: CliError = RepoError::ResponseDecode {
            url: "https://api.github.com/repos/nginxinc/helm-charts/contents/stable/".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        }
        .into();
        assert!(matches!(err, CliError::Remote { .. }));
        assert_eq!(err.exit_code(), exit_codes::REMOTE_ERROR);

        let err: CliError = RepoError::ConfigParse {
            message: "did not find expected node content".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
    }
}
