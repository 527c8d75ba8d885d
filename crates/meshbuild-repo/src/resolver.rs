//! Latest bundle version discovery over a remote tree

use meshbuild_core::{BundleNaming, BundleVersion, candidate_versions, latest_version};
use std::time::Duration;

use crate::error::{RepoError, Result};
use crate::walker::{RemoteFile, RemoteTree};

async fn list(tree: &dyn RemoteTree, deadline: Option<Duration>) -> Result<Vec<RemoteFile>> {
    match deadline {
        Some(limit) => tokio::time::timeout(limit, tree.files())
            .await
            .map_err(|_| RepoError::Timeout {
                seconds: limit.as_secs(),
            })?,
        None => tree.files().await,
    }
}

/// Highest bundle version published under the tree root.
///
/// No retries: a listing failure is returned as is.
pub async fn resolve_latest_version(
    tree: &dyn RemoteTree,
    naming: &BundleNaming,
    deadline: Option<Duration>,
) -> Result<String> {
    let files = list(tree, deadline).await?;
    let latest = latest_version(files.iter().map(|f| f.name.as_str()), naming)?;

    tracing::info!(
        location = %tree.location(),
        version = %latest,
        "resolved latest bundle version"
    );
    Ok(latest.as_str().to_string())
}

/// Every well-formed bundle version under the tree root, ascending
pub async fn list_versions(
    tree: &dyn RemoteTree,
    naming: &BundleNaming,
    deadline: Option<Duration>,
) -> Result<Vec<BundleVersion>> {
    let files = list(tree, deadline).await?;
    Ok(candidate_versions(
        files.iter().map(|f| f.name.as_str()),
        naming,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use meshbuild_core::ErrorKind;

    struct FakeTree(Vec<&'static str>);

    #[async_trait]
    impl RemoteTree for FakeTree {
        fn location(&self) -> String {
            "fake".to_string()
        }

        async fn files(&self) -> Result<Vec<RemoteFile>> {
            Ok(self.0.iter().map(|n| RemoteFile::file(*n)).collect())
        }
    }

    struct BrokenTree;

    #[async_trait]
    impl RemoteTree for BrokenTree {
        fn location(&self) -> String {
            "broken".to_string()
        }

        async fn files(&self) -> Result<Vec<RemoteFile>> {
            Err(RepoError::NetworkError {
                message: "connection reset".to_string(),
            })
        }
    }

    struct StuckTree;

    #[async_trait]
    impl RemoteTree for StuckTree {
        fn location(&self) -> String {
            "stuck".to_string()
        }

        async fn files(&self) -> Result<Vec<RemoteFile>> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_resolves_highest() {
        let tree = FakeTree(vec![
            "index.yaml",
            "nginx-service-mesh-1.9.0.tgz",
            "nginx-service-mesh-1.10.0.tgz",
            "nginx-ingress-2.0.0.tgz",
            "nginx-service-mesh-2.0.0.tgz",
        ]);
        let version = resolve_latest_version(&tree, &BundleNaming::default(), None)
            .await
            .unwrap();
        assert_eq!(version, "2.0.0");
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let tree = FakeTree(vec!["foo-1.0.0.tgz", "nginx-service-mesh-1.2.0.txt"]);
        let err = resolve_latest_version(&tree, &BundleNaming::default(), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces() {
        let err = resolve_latest_version(&BrokenTree, &BundleNaming::default(), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline() {
        let err = resolve_latest_version(
            &StuckTree,
            &BundleNaming::default(),
            Some(Duration::from_secs(5)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Timeout { seconds: 5 }));
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
    }

    #[tokio::test]
    async fn test_list_versions() {
        let tree = FakeTree(vec![
            "nginx-service-mesh-0.10.0.tgz",
            "nginx-service-mesh-0.9.1.tgz",
            "nginx-service-mesh-bogus.tgz",
        ]);
        let versions = list_versions(&tree, &BundleNaming::default(), None)
            .await
            .unwrap();
        let versions: Vec<_> = versions.iter().map(|v| v.as_str()).collect();
        assert_eq!(versions, ["0.9.1", "0.10.0"]);
    }
}
