use indexmap::IndexMap;

use cairn_cache::CacheIndex;
use cairn_error::{PackageError, Result};
use cairn_naming::PackageSource;

use crate::{DependencyProvider, DependencyRequest, LATEST_SPEC, Resolved, ResolvedPackage};

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverOptions {
    /// When set, two branches resolving the same name to different versions
    /// fail instead of the later one overwriting the earlier.
    pub strict_conflicts: bool,
}

pub struct Resolver<'a, P: DependencyProvider> {
    provider: &'a P,
    cache: &'a CacheIndex,
    options: ResolverOptions,
}

impl<'a, P: DependencyProvider> Resolver<'a, P> {
    pub fn new(provider: &'a P, cache: &'a CacheIndex) -> Self {
        Self::with_options(provider, cache, ResolverOptions::default())
    }

    pub fn with_options(provider: &'a P, cache: &'a CacheIndex, options: ResolverOptions) -> Self {
        Self {
            provider,
            cache,
            options,
        }
    }

    /// Expand `requests` into a full resolution. Duplicate names are
    /// deduplicated in the flat view, most recently resolved wins.
    pub fn resolve(&self, requests: &[DependencyRequest]) -> Result<Resolved> {
        let mut flat = IndexMap::new();
        let mut tree = IndexMap::new();
        let mut in_progress = Vec::new();

        for request in requests {
            let package = self.resolve_request(request, &mut flat, &mut in_progress)?;
            tree.insert(package.name.clone(), package);
        }

        Ok(Resolved { tree, flat })
    }

    fn resolve_request(
        &self,
        request: &DependencyRequest,
        flat: &mut IndexMap<String, ResolvedPackage>,
        in_progress: &mut Vec<String>,
    ) -> Result<ResolvedPackage> {
        let version = match (request.source, request.spec.as_str()) {
            (PackageSource::Registry, LATEST_SPEC) => self.provider.latest_version(&request.name)?,
            _ => request.spec.clone(),
        };

        let key = format!("{}@{}", request.name, version);
        if in_progress.contains(&key) {
            return Err(PackageError::CyclicDependency(key));
        }

        if self.options.strict_conflicts {
            if let Some(existing) = flat.get(&request.name) {
                if existing.version != version {
                    return Err(PackageError::DependencyConflict(
                        request.name.clone(),
                        format!("{} vs {}", existing.version, version),
                    ));
                }
            }
        }

        // Record identity before recursing; a later visit of the same name
        // overwrites the value but keeps the first insertion's position.
        flat.insert(
            request.name.clone(),
            ResolvedPackage {
                name: request.name.clone(),
                version: version.clone(),
                source: request.source,
                dependencies: IndexMap::new(),
            },
        );

        in_progress.push(key);
        let child_requests = self.discover_dependencies(&request.name, &version, request.source)?;

        let mut dependencies = IndexMap::new();
        for child in &child_requests {
            let resolved = self.resolve_request(child, flat, in_progress)?;
            dependencies.insert(resolved.name.clone(), resolved);
        }
        in_progress.pop();

        Ok(ResolvedPackage {
            name: request.name.clone(),
            version,
            source: request.source,
            dependencies,
        })
    }

    /// A cache entry that carries a manifest saves the network round trip;
    /// everything else goes through the provider.
    fn discover_dependencies(
        &self,
        name: &str,
        version: &str,
        source: PackageSource,
    ) -> Result<Vec<DependencyRequest>> {
        let cache_key = cairn_naming::to_cache_key(source, name, version);
        if self.cache.cached_manifest_path(&cache_key).is_some() {
            if let Ok(manifest) = cairn_project::read_manifest(&self.cache.cache_path(&cache_key)) {
                let deps = manifest.deps.unwrap_or_default();
                return crate::requests_from_deps_table(&deps);
            }
        }
        self.provider.dependencies_of(name, version, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    struct MockProvider {
        latest: HashMap<String, String>,
        deps: HashMap<String, Vec<DependencyRequest>>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                latest: HashMap::new(),
                deps: HashMap::new(),
            }
        }

        fn with_latest(mut self, name: &str, version: &str) -> Self {
            self.latest.insert(name.to_string(), version.to_string());
            self
        }

        fn with_deps(mut self, key: &str, deps: Vec<DependencyRequest>) -> Self {
            self.deps.insert(key.to_string(), deps);
            self
        }
    }

    impl DependencyProvider for MockProvider {
        fn latest_version(&self, name: &str) -> Result<String> {
            self.latest
                .get(name)
                .cloned()
                .ok_or_else(|| PackageError::ResolutionIo(format!("no such package: {name}")))
        }

        fn dependencies_of(
            &self,
            name: &str,
            version: &str,
            _source: PackageSource,
        ) -> Result<Vec<DependencyRequest>> {
            Ok(self
                .deps
                .get(&format!("{name}@{version}"))
                .cloned()
                .unwrap_or_default())
        }
    }

    fn empty_cache() -> CacheIndex {
        CacheIndex::new(
            PathBuf::from("/nonexistent/cairn-cache"),
            PathBuf::from("/nonexistent/cairn-deps"),
        )
    }

    fn registry(name: &str, spec: &str) -> DependencyRequest {
        DependencyRequest::new(name, spec, PackageSource::Registry)
    }

    fn all_tree_names(nodes: &IndexMap<String, ResolvedPackage>, out: &mut Vec<String>) {
        for (name, node) in nodes {
            out.push(name.clone());
            all_tree_names(&node.dependencies, out);
        }
    }

    #[test]
    fn test_latest_is_pinned_and_flat_matches_tree() {
        let provider = MockProvider::new().with_latest("fmt", "6.0.0");
        let cache = empty_cache();
        let resolver = Resolver::new(&provider, &cache);

        let resolved = resolver.resolve(&[registry("fmt", "latest")]).unwrap();

        let fmt = &resolved.tree["fmt"];
        assert_eq!(fmt.version, "6.0.0");
        assert_eq!(fmt.source, PackageSource::Registry);
        assert!(fmt.dependencies.is_empty());
        assert_eq!(resolved.flat["fmt"], *fmt);
        assert_eq!(resolved.flat.len(), 1);
    }

    #[test]
    fn test_transitive_expansion_preserves_order() {
        let provider = MockProvider::new()
            .with_deps(
                "app-base@1.0.0",
                vec![registry("zlib", "1.2.11"), registry("fmt", "6.0.0")],
            )
            .with_deps("fmt@6.0.0", vec![registry("ranges", "0.3.0")]);
        let cache = empty_cache();
        let resolver = Resolver::new(&provider, &cache);

        let resolved = resolver.resolve(&[registry("app-base", "1.0.0")]).unwrap();

        let base = &resolved.tree["app-base"];
        let child_names: Vec<_> = base.dependencies.keys().cloned().collect();
        assert_eq!(child_names, vec!["zlib", "fmt"]);
        assert_eq!(
            base.dependencies["fmt"].dependencies["ranges"].version,
            "0.3.0"
        );

        // Every name in the tree, at any depth, appears exactly once flat.
        let mut tree_names = Vec::new();
        all_tree_names(&resolved.tree, &mut tree_names);
        for name in &tree_names {
            assert!(resolved.flat.contains_key(name));
        }
        tree_names.sort();
        tree_names.dedup();
        assert_eq!(resolved.flat.len(), tree_names.len());
    }

    #[test]
    fn test_duplicate_name_last_write_wins() {
        let provider = MockProvider::new()
            .with_deps("alpha@1.0.0", vec![registry("common", "1.0.0")])
            .with_deps("beta@1.0.0", vec![registry("common", "2.0.0")]);
        let cache = empty_cache();
        let resolver = Resolver::new(&provider, &cache);

        let resolved = resolver
            .resolve(&[registry("alpha", "1.0.0"), registry("beta", "1.0.0")])
            .unwrap();

        assert_eq!(resolved.flat.len(), 3);
        // The later visit overwrote the value...
        assert_eq!(resolved.flat["common"].version, "2.0.0");
        // ...but the first insertion's position is kept.
        let order: Vec<_> = resolved.flat.keys().cloned().collect();
        assert_eq!(order, vec!["alpha", "common", "beta"]);
        // The tree keeps both occurrences at their own depths.
        assert_eq!(
            resolved.tree["alpha"].dependencies["common"].version,
            "1.0.0"
        );
        assert_eq!(
            resolved.tree["beta"].dependencies["common"].version,
            "2.0.0"
        );
    }

    #[test]
    fn test_strict_conflicts_fail_loudly() {
        let provider = MockProvider::new()
            .with_deps("alpha@1.0.0", vec![registry("common", "1.0.0")])
            .with_deps("beta@1.0.0", vec![registry("common", "2.0.0")]);
        let cache = empty_cache();
        let resolver = Resolver::with_options(
            &provider,
            &cache,
            ResolverOptions {
                strict_conflicts: true,
            },
        );

        let err = resolver
            .resolve(&[registry("alpha", "1.0.0"), registry("beta", "1.0.0")])
            .unwrap_err();
        assert!(matches!(err, PackageError::DependencyConflict(name, _) if name == "common"));
    }

    #[test]
    fn test_strict_conflicts_allow_identical_versions() {
        let provider = MockProvider::new()
            .with_deps("alpha@1.0.0", vec![registry("common", "1.0.0")])
            .with_deps("beta@1.0.0", vec![registry("common", "1.0.0")]);
        let cache = empty_cache();
        let resolver = Resolver::with_options(
            &provider,
            &cache,
            ResolverOptions {
                strict_conflicts: true,
            },
        );

        let resolved = resolver
            .resolve(&[registry("alpha", "1.0.0"), registry("beta", "1.0.0")])
            .unwrap();
        assert_eq!(resolved.flat.len(), 3);
    }

    #[test]
    fn test_cycle_is_reported() {
        let provider = MockProvider::new()
            .with_deps("ping@1.0.0", vec![registry("pong", "1.0.0")])
            .with_deps("pong@1.0.0", vec![registry("ping", "1.0.0")]);
        let cache = empty_cache();
        let resolver = Resolver::new(&provider, &cache);

        let err = resolver.resolve(&[registry("ping", "1.0.0")]).unwrap_err();
        assert!(matches!(err, PackageError::CyclicDependency(key) if key == "ping@1.0.0"));
    }

    #[test]
    fn test_git_spec_passes_through_verbatim() {
        let provider = MockProvider::new();
        let cache = empty_cache();
        let resolver = Resolver::new(&provider, &cache);

        let request = DependencyRequest::new("opencv/opencv", "3.4.2", PackageSource::Git);
        let resolved = resolver.resolve(&[request]).unwrap();
        assert_eq!(resolved.tree["opencv/opencv"].version, "3.4.2");
    }

    #[test]
    fn test_from_tree_matches_resolver_flat() {
        let provider = MockProvider::new()
            .with_deps(
                "app-base@1.0.0",
                vec![registry("zlib", "1.2.11"), registry("fmt", "6.0.0")],
            )
            .with_deps("fmt@6.0.0", vec![registry("zlib", "1.2.12")]);
        let cache = empty_cache();
        let resolver = Resolver::new(&provider, &cache);

        let resolved = resolver.resolve(&[registry("app-base", "1.0.0")]).unwrap();
        let rebuilt = Resolved::from_tree(resolved.tree.clone());
        assert_eq!(rebuilt.flat, resolved.flat);
    }

    #[test]
    fn test_cached_manifest_short_circuits_provider() {
        let root = tempfile::tempdir().unwrap();
        let cache = CacheIndex::new(root.path().join("cache"), root.path().join("deps"));
        cache.ensure_roots().unwrap();

        // The cache entry for fmt-6.0.0 carries a manifest declaring one
        // dependency; the provider knows nothing about fmt.
        let entry = cache.cache_path("fmt-6.0.0");
        std::fs::create_dir_all(&entry).unwrap();
        std::fs::write(entry.join("cairn.toml"), "[deps]\nranges = \"0.3.0\"\n").unwrap();

        let provider = MockProvider::new();
        let resolver = Resolver::new(&provider, &cache);

        let resolved = resolver.resolve(&[registry("fmt", "6.0.0")]).unwrap();
        assert_eq!(
            resolved.tree["fmt"].dependencies["ranges"].version,
            "0.3.0"
        );
        assert!(resolved.flat.contains_key("ranges"));
    }
}
