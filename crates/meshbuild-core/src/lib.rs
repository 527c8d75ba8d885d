//! meshbuild Core - Types and algorithms for generating mesh model components
//!
//! This crate provides the pure building blocks used by the adapter build:
//! - `BundleVersion`: dotted integer versions parsed from chart archive names
//! - `BundleNaming`: the `<prefix><version><suffix>` archive convention
//! - `ExtractionConfig`: how to split rendered manifests and locate CRD fields
//! - `PathExpr`: dot/array-index path expressions over parsed documents
//! - `MeshModelConfig`: component classification plus opaque metadata

pub mod error;
pub mod extraction;
pub mod metadata;
pub mod path;
pub mod version;

pub use error::{CoreError, ErrorKind, Result};
pub use extraction::{
    CrdFilter, DOCUMENT_SEPARATOR, ExtractedResource, ExtractionConfig, ExtractorPaths,
    NGINX_SERVICE_MESH, SplitStrategy,
};
pub use metadata::{
    DEFAULT_METADATA_PATH, MeshModelConfig, Metadata, load_metadata,
};
pub use path::{PathExpr, Segment};
pub use version::{BundleNaming, BundleVersion, candidate_versions, latest_version};
