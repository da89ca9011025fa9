//! Dependency resolution: turn requested constraints into a transitively
//! closed set of concrete package versions.
//!
//! Resolution is single-pass per requested package. A `latest` registry
//! request is pinned against the registry's version listing; every other
//! constraint is taken at face value as the version or tag to fetch. No
//! candidate search, no backtracking.

pub mod resolver;

use indexmap::IndexMap;

use cairn_error::Result;
use cairn_naming::PackageSource;

pub use resolver::{Resolver, ResolverOptions};

/// Sentinel spec meaning "pin to the newest registry version".
pub const LATEST_SPEC: &str = "latest";

/// One requested constraint: a name, a version-or-tag spec, and a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRequest {
    pub name: String,
    pub spec: String,
    pub source: PackageSource,
}

impl DependencyRequest {
    #[must_use]
    pub fn new(name: impl Into<String>, spec: impl Into<String>, source: PackageSource) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
            source,
        }
    }
}

/// A node in the resolution tree. `dependencies` holds the package's own
/// requirements, recursively resolved, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub name: String,
    pub version: String,
    pub source: PackageSource,
    pub dependencies: IndexMap<String, ResolvedPackage>,
}

/// Two views over one resolution: the nested tree (persisted to the
/// lockfile) and the name-deduplicated flat map (fetched/installed).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub tree: IndexMap<String, ResolvedPackage>,
    pub flat: IndexMap<String, ResolvedPackage>,
}

impl Resolved {
    /// Rebuild the flat view from a persisted tree, applying the same
    /// pre-order last-write-wins walk the resolver uses.
    #[must_use]
    pub fn from_tree(tree: IndexMap<String, ResolvedPackage>) -> Self {
        let mut flat = IndexMap::new();
        flatten_into(&tree, &mut flat);
        Self { tree, flat }
    }
}

fn flatten_into(
    nodes: &IndexMap<String, ResolvedPackage>,
    flat: &mut IndexMap<String, ResolvedPackage>,
) {
    for (name, node) in nodes {
        flat.insert(
            name.clone(),
            ResolvedPackage {
                name: node.name.clone(),
                version: node.version.clone(),
                source: node.source,
                dependencies: IndexMap::new(),
            },
        );
        flatten_into(&node.dependencies, flat);
    }
}

/// External collaborator the resolver expands manifests through. The HTTP
/// registry client implements this; tests use an in-memory table.
pub trait DependencyProvider {
    /// Newest available registry version for `name`.
    fn latest_version(&self, name: &str) -> Result<String>;

    /// Declared dependencies of one concrete package version, in manifest
    /// declaration order.
    fn dependencies_of(
        &self,
        name: &str,
        version: &str,
        source: PackageSource,
    ) -> Result<Vec<DependencyRequest>>;
}

/// Convert a manifest `deps` table into requests, classifying each raw
/// identifier (`github/owner/repo` entries become git requests).
pub fn requests_from_deps_table(
    deps: &IndexMap<String, cairn_project::DepEntry>,
) -> Result<Vec<DependencyRequest>> {
    let mut requests = Vec::with_capacity(deps.len());
    for (raw_name, entry) in deps {
        let (source, name) = cairn_naming::classify_source(raw_name);
        let spec = cairn_project::get_version(entry, source)?;
        requests.push(DependencyRequest { name, spec, source });
    }
    Ok(requests)
}
