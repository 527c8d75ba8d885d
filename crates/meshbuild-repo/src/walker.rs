//! Remote file tree listing
//!
//! [`RemoteTree`] hands back a finite list of files. [`GitHubTree`] implements
//! it over the GitHub contents API for one directory of one branch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::SourceConfig;
use crate::error::{RepoError, Result};
use crate::http::HttpClient;

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Entry kind reported by the contents API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// A file discovered under the tree root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub name: String,

    /// Path from the repository root
    pub path: String,

    #[serde(rename = "type")]
    pub kind: EntryKind,

    #[serde(default)]
    pub size: u64,

    #[serde(default)]
    pub download_url: Option<String>,
}

impl RemoteFile {
    /// Build a plain file record (mostly useful for fakes)
    pub fn file(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            kind: EntryKind::File,
            size: 0,
            download_url: None,
        }
    }
}

/// Source of file listings
#[async_trait]
pub trait RemoteTree: Send + Sync {
    /// Human-readable location, used in logs
    fn location(&self) -> String;

    /// List every file under the root. Directories are not returned.
    async fn files(&self) -> Result<Vec<RemoteFile>>;
}

/// GitHub repository directory walker
pub struct GitHubTree {
    source: SourceConfig,
    client: HttpClient,
}

impl GitHubTree {
    pub fn new(source: SourceConfig, client: HttpClient) -> Self {
        Self { source, client }
    }

    fn contents_url(&self, dir: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.source.api_url.trim_end_matches('/'),
            self.source.owner,
            self.source.repo,
            dir.trim_matches('/'),
            self.source.branch
        )
    }

    async fn list_dir(&self, dir: &str) -> Result<Vec<RemoteFile>> {
        let url = self.contents_url(dir);
        tracing::debug!(url = %url, "listing remote directory");

        let value: serde_json::Value = self.client.get_json(&url, GITHUB_JSON).await?;
        if !value.is_array() {
            // A file path returns a single object rather than a listing
            return Err(RepoError::InvalidListing {
                url,
                message: "expected a directory listing".to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| RepoError::InvalidListing {
            url,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl RemoteTree for GitHubTree {
    fn location(&self) -> String {
        format!(
            "github.com/{}/{}@{}:{}",
            self.source.owner, self.source.repo, self.source.branch, self.source.root
        )
    }

    async fn files(&self) -> Result<Vec<RemoteFile>> {
        let mut files = Vec::new();
        let mut pending = VecDeque::from([self.source.root.clone()]);

        while let Some(dir) = pending.pop_front() {
            for entry in self.list_dir(&dir).await? {
                match entry.kind {
                    EntryKind::File => files.push(entry),
                    EntryKind::Dir if self.source.recursive => pending.push_back(entry.path),
                    _ => {}
                }
            }
        }

        tracing::debug!(count = files.len(), "remote listing complete");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entry(name: &str, dir: &str, kind: &str) -> serde_json::Value {
        let download_url = (kind == "file")
            .then(|| format!("https://raw.githubusercontent.com/o/r/master/{}/{}", dir, name));
        json!({
            "name": name,
            "path": format!("{}/{}", dir, name),
            "type": kind,
            "size": 1024,
            "download_url": download_url,
            "sha": "abc",
        })
    }

    fn source(server: &MockServer, recursive: bool) -> SourceConfig {
        SourceConfig {
            api_url: server.uri(),
            owner: "nginxinc".to_string(),
            repo: "helm-charts".to_string(),
            branch: "master".to_string(),
            root: "stable/".to_string(),
            recursive,
            ..SourceConfig::default()
        }
    }

    async fn mount_listing(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/repos/nginxinc/helm-charts/contents/stable"))
            .and(query_param("ref", "master"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                entry("nginx-service-mesh-1.6.0.tgz", "stable", "file"),
                entry("nginx-ingress-0.18.0.tgz", "stable", "file"),
                entry("archive", "stable", "dir"),
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/nginxinc/helm-charts/contents/stable/archive"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                entry("nginx-service-mesh-0.9.0.tgz", "stable/archive", "file"),
            ])))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_lists_files_only() {
        let server = MockServer::start().await;
        mount_listing(&server).await;

        let tree = GitHubTree::new(source(&server, false), HttpClient::public().unwrap());
        let files = tree.files().await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["nginx-service-mesh-1.6.0.tgz", "nginx-ingress-0.18.0.tgz"]);
        assert_eq!(files[0].kind, EntryKind::File);
        assert_eq!(files[0].path, "stable/nginx-service-mesh-1.6.0.tgz");
    }

    #[tokio::test]
    async fn test_recursive_listing() {
        let server = MockServer::start().await;
        mount_listing(&server).await;

        let tree = GitHubTree::new(source(&server, true), HttpClient::public().unwrap());
        let files = tree.files().await.unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(files[2].name, "nginx-service-mesh-0.9.0.tgz");
    }

    #[tokio::test]
    async fn test_listing_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let tree = GitHubTree::new(source(&server, false), HttpClient::public().unwrap());
        let err = tree.files().await.unwrap_err();
        assert!(matches!(err, RepoError::HttpError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_root_is_a_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(entry("README.md", "stable", "file")),
            )
            .mount(&server)
            .await;

        let tree = GitHubTree::new(source(&server, false), HttpClient::public().unwrap());
        let err = tree.files().await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidListing { .. }));
    }

    #[test]
    fn test_location() {
        let tree = GitHubTree::new(SourceConfig::default(), HttpClient::public().unwrap());
        assert_eq!(tree.location(), "github.com/nginxinc/helm-charts@master:stable/");
    }
}
