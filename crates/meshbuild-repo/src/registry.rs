//! Chart version to application version lookup

use async_trait::async_trait;

use crate::error::{RepoError, Result};
use crate::http::HttpClient;
use crate::index::RepositoryIndex;

/// Maps a chart version to the version of the application it packages
#[async_trait]
pub trait ChartRegistry: Send + Sync {
    async fn app_version(&self, repo_url: &str, chart: &str, version: &str) -> Result<String>;
}

/// Reads `appVersion` from a Helm repository's `index.yaml`
pub struct HttpChartRegistry {
    client: HttpClient,
}

impl HttpChartRegistry {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn index_url(repo_url: &str) -> String {
        format!("{}/index.yaml", repo_url.trim_end_matches('/'))
    }

    pub async fn fetch_index(&self, repo_url: &str) -> Result<RepositoryIndex> {
        let url = Self::index_url(repo_url);
        tracing::debug!(url = %url, "fetching chart index");
        let yaml = self.client.get_text(&url).await?;
        RepositoryIndex::from_yaml(&yaml)
    }
}

#[async_trait]
impl ChartRegistry for HttpChartRegistry {
    async fn app_version(&self, repo_url: &str, chart: &str, version: &str) -> Result<String> {
        let index = self.fetch_index(repo_url).await?;

        if index.get(chart).is_none() {
            return Err(RepoError::ChartNotFound {
                name: chart.to_string(),
                repo: repo_url.to_string(),
            });
        }

        let entry =
            index
                .get_version(chart, version)
                .ok_or_else(|| RepoError::VersionNotFound {
                    name: chart.to_string(),
                    version: version.to_string(),
                    repo: repo_url.to_string(),
                })?;

        entry
            .app_version
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RepoError::MissingAppVersion {
                name: chart.to_string(),
                version: version.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const INDEX: &str = r#"
apiVersion: v1
entries:
  nginx-service-mesh:
    - name: nginx-service-mesh
      version: "0.7.0"
      appVersion: "1.7.0"
    - name: nginx-service-mesh
      version: "0.8.0"
"#;

    async fn registry_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stable/index.yaml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(INDEX))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_index_url() {
        assert_eq!(
            HttpChartRegistry::index_url("https://helm.nginx.com/stable/"),
            "https://helm.nginx.com/stable/index.yaml"
        );
    }

    #[tokio::test]
    async fn test_app_version() {
        let server = registry_server().await;
        let registry = HttpChartRegistry::new(HttpClient::public().unwrap());
        let repo = format!("{}/stable", server.uri());

        let version = registry
            .app_version(&repo, "nginx-service-mesh", "0.7.0")
            .await
            .unwrap();
        assert_eq!(version, "1.7.0");
    }

    #[tokio::test]
    async fn test_lookup_failures() {
        let server = registry_server().await;
        let registry = HttpChartRegistry::new(HttpClient::public().unwrap());
        let repo = format!("{}/stable", server.uri());

        let err = registry
            .app_version(&repo, "nginx-service-mesh", "9.9.9")
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::VersionNotFound { .. }));

        let err = registry
            .app_version(&repo, "nginx-service-mesh", "0.8.0")
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::MissingAppVersion { .. }));

        let err = registry
            .app_version(&repo, "nginx-ingress", "0.7.0")
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ChartNotFound { .. }));

        let err = registry
            .app_version(&format!("{}/missing", server.uri()), "nginx-service-mesh", "0.7.0")
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::HttpError { status: 404, .. }));
    }
}
