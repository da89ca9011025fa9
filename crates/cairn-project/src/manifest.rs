use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use cairn_error::{PackageError, Result};
use cairn_naming::PackageSource;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Manifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    // Catch-all so a rewrite never drops fields this model does not know.
    #[serde(flatten)]
    pub other: IndexMap<String, toml::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps: Option<IndexMap<String, DepEntry>>,
}

/// One entry in the `deps` table: either a bare version/interval scalar or
/// a detailed table (`version` for registry entries, `tag` for git ones).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum DepEntry {
    Version(String),
    Detailed(DepDetail),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DepDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Manifest {
    /// Pin or rewrite one dependency to a scalar interval string.
    pub fn set_dep_interval(&mut self, name: &str, interval: &str) {
        self.deps
            .get_or_insert_with(IndexMap::new)
            .insert(name.to_string(), DepEntry::Version(interval.to_string()));
    }

    /// Record a git dependency under its tag.
    pub fn set_dep_tag(&mut self, name: &str, tag: &str) {
        self.deps.get_or_insert_with(IndexMap::new).insert(
            name.to_string(),
            DepEntry::Detailed(DepDetail {
                version: None,
                tag: Some(tag.to_string()),
            }),
        );
    }
}

/// The version (registry) or tag (git) a dependency entry declares.
pub fn get_version(entry: &DepEntry, source: PackageSource) -> Result<String> {
    match source {
        PackageSource::Git => {
            if let DepEntry::Detailed(DepDetail { tag: Some(tag), .. }) = entry {
                return Ok(tag.clone());
            }
        }
        PackageSource::Registry => match entry {
            DepEntry::Version(version) => return Ok(version.clone()),
            DepEntry::Detailed(DepDetail {
                version: Some(version),
                ..
            }) => return Ok(version.clone()),
            DepEntry::Detailed(_) => {}
        },
    }
    Err(PackageError::UnknownSource(source.to_string()))
}
