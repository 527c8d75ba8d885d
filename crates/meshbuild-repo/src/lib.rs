//! meshbuild Remote Sources
//!
//! This crate connects the pure types in `meshbuild-core` to the outside world:
//!
//! - **Tree walking**: list chart archives in a GitHub repository directory
//! - **Chart registry**: map a chart version to its `appVersion` via a Helm
//!   repository `index.yaml`
//! - **Bootstrap**: run the whole initialization once and return an immutable
//!   [`BuildInfo`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use meshbuild_repo::{BuildConfig, bootstrap_remote};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BuildConfig::default();
//! let info = bootstrap_remote(&config, &std::env::current_dir()?).await?;
//!
//! if let Some(version) = info.default_version() {
//!     println!("targeting NGINX Service Mesh {}", version);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Collaborators sit behind the [`RemoteTree`] and [`ChartRegistry`] traits so
//! [`bootstrap`] can run against fakes.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod http;
pub mod index;
pub mod registry;
pub mod resolver;
pub mod walker;

// Re-exports for convenience
pub use bootstrap::{
    BuildFailure, BuildInfo, GenerationMethod, ResolvedBuild, bootstrap, bootstrap_remote,
};
pub use config::{BuildConfig, ChartConfig, SourceConfig, VERSION_PLACEHOLDER};
pub use error::{RepoError, Result};
pub use http::HttpClient;
pub use index::{ChartEntry, RepositoryIndex};
pub use registry::{ChartRegistry, HttpChartRegistry};
pub use resolver::{list_versions, resolve_latest_version};
pub use walker::{EntryKind, GitHubTree, RemoteFile, RemoteTree};
