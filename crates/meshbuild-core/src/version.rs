//! Bundle version discovery
//!
//! Chart archives are published as `<prefix><version><suffix>`, e.g.
//! `nginx-service-mesh-1.7.0.tgz`. This module extracts the version token from
//! such names and orders tokens as dotted integer sequences, so `1.10.0`
//! sorts above `1.9.0`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{CoreError, Result};

/// A dotted sequence of non-negative integers taken from an archive name
///
/// Segments are kept as digit strings without leading zeros, so integers of
/// any width compare correctly.
#[derive(Debug, Clone)]
pub struct BundleVersion {
    raw: String,
    segments: Vec<String>,
}

impl BundleVersion {
    /// Parse a version token. Every dot-separated segment must be non-empty
    /// and consist only of ASCII digits.
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = |reason: &str| CoreError::InvalidVersion {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        if token.is_empty() {
            return Err(invalid("empty version"));
        }

        let segments = token
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    return Err(invalid("empty segment"));
                }
                if !seg.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid(&format!("non-numeric segment '{}'", seg)));
                }
                Ok(match seg.trim_start_matches('0') {
                    "" => "0".to_string(),
                    digits => digits.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            raw: token.to_string(),
            segments,
        })
    }

    /// The token as it appeared in the archive name
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Integer segments as normalized digit strings
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for BundleVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for BundleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).map_or("0", String::as_str);
            let b = other.segments.get(i).map_or("0", String::as_str);
            match a.len().cmp(&b.len()).then_with(|| a.cmp(b)) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for BundleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality follows the ordering, so "1.2" == "1.2.0".
impl PartialEq for BundleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BundleVersion {}

/// Naming convention for bundle archives in the remote tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleNaming {
    /// Leading part of the file name, including the trailing dash
    pub prefix: String,

    /// Archive extension
    pub suffix: String,
}

impl Default for BundleNaming {
    fn default() -> Self {
        Self::new("nginx-service-mesh-", ".tgz")
    }
}

impl BundleNaming {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Strip prefix and suffix from a file name, if it follows the convention
    pub fn version_token<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        if !file_name.ends_with(&self.suffix) {
            return None;
        }
        file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())
    }

    /// Render the archive file name for a version
    pub fn file_name(&self, version: &str) -> String {
        format!("{}{}{}", self.prefix, version, self.suffix)
    }
}

/// Collect every well-formed bundle version from a listing, sorted ascending.
///
/// Names outside the convention are skipped silently; names inside it whose
/// token does not parse are skipped with a debug log. The sort is stable, so
/// equal versions keep discovery order.
pub fn candidate_versions<I, S>(names: I, naming: &BundleNaming) -> Vec<BundleVersion>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut versions: Vec<BundleVersion> = names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let token = naming.version_token(name)?;
            match BundleVersion::parse(token) {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::debug!(file = name, "skipping bundle archive: {}", e);
                    None
                }
            }
        })
        .collect();

    versions.sort();
    versions
}

/// Pick the greatest bundle version from a listing
pub fn latest_version<I, S>(names: I, naming: &BundleNaming) -> Result<BundleVersion>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidate_versions(names, naming)
        .pop()
        .ok_or_else(|| CoreError::NoBundlesFound {
            prefix: naming.prefix.clone(),
            suffix: naming.suffix.clone(),
        })
}
