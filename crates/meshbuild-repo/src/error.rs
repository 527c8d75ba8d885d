//! Error types for remote source operations

use meshbuild_core::{CoreError, ErrorKind};
use thiserror::Error;

/// Remote source errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Configuration Errors ============
    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid build configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to parse build configuration: {message}")]
    ConfigParse { message: String },

    // ============ Network Errors ============
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Rate limited by server. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("Authentication required for {url}")]
    AuthRequired { url: String },

    #[error("Access denied: {message}")]
    AuthFailed { message: String },

    #[error("Undecodable response from {url}: {message}")]
    ResponseDecode { url: String, message: String },

    // ============ Listing Errors ============
    #[error("Invalid tree listing from {url}: {message}")]
    InvalidListing { url: String, message: String },

    // ============ Index Errors ============
    #[error("Index parse error: {message}")]
    IndexParseError { message: String },

    #[error("Chart not found: {name} in repository {repo}")]
    ChartNotFound { name: String, repo: String },

    #[error("Version not found: {name}@{version} in repository {repo}")]
    VersionNotFound {
        name: String,
        version: String,
        repo: String,
    },

    #[error("Chart {name}@{version} has no appVersion")]
    MissingAppVersion { name: String, version: String },

    // ============ Core ============
    #[error(transparent)]
    Core(#[from] CoreError),

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RepoError {
    /// Map onto the initialization failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepoError::Core(e) => e.kind().unwrap_or(ErrorKind::TransportFailure),
            RepoError::IndexParseError { .. }
            | RepoError::ChartNotFound { .. }
            | RepoError::VersionNotFound { .. }
            | RepoError::MissingAppVersion { .. } => ErrorKind::TranslationFailure,
            _ => ErrorKind::TransportFailure,
        }
    }
}

/// Result type for remote source operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            RepoError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else if let Some(status) = e.status() {
            RepoError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            RepoError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_yaml::Error> for RepoError {
    fn from(e: serde_yaml::Error) -> Self {
        RepoError::ConfigParse {
            message: e.to_string(),
        }
    }
}

impl From<url::ParseError> for RepoError {
    fn from(e: url::ParseError) -> Self {
        RepoError::InvalidUrl {
            url: String::new(),
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let err = RepoError::HttpError {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::TransportFailure);

        let err = RepoError::VersionNotFound {
            name: "nginx-service-mesh".to_string(),
            version: "9.9.9".to_string(),
            repo: "https://helm.nginx.com/stable".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::TranslationFailure);

        let err = RepoError::Core(CoreError::NoBundlesFound {
            prefix: "p-".to_string(),
            suffix: ".tgz".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().starts_with("no files found"));

        let err = RepoError::ResponseDecode {
            url: "https://api.github.com/x".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
    }

    #[test]
    fn test_yaml_errors_are_config_errors() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [").unwrap_err();
        assert!(matches!(
            RepoError::from(yaml_err),
            RepoError::ConfigParse { .. }
        ));
    }
}
