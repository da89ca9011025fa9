use std::path::{Path, PathBuf};

use cairn_cache::CacheIndex;
use cairn_constants::{DEPS_DIR_NAME, LOCKFILE_NAME};
use cairn_error::{PackageError, Result};
use cairn_lock::CairnLock;
use cairn_naming::{
    PackageSource, classify_source, is_valid_identifier, to_cache_key, to_current_key,
};
use cairn_project::{manifest_timestamp, read_manifest, write_manifest};
use cairn_registry::{RegistryClient, clone_repository};
use cairn_resolver::{
    DependencyProvider, DependencyRequest, LATEST_SPEC, Resolved, Resolver,
    requests_from_deps_table,
};

use crate::convert;

#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    pub quiet: bool,
    pub verbose: bool,
}

/// `name` or `name=interval` from the command line. A `github/` path
/// segment reclassifies the request as a git dependency.
pub fn parse_arg_package(raw: &str) -> Result<DependencyRequest> {
    let (raw_name, spec) = match raw.split_once('=') {
        Some((name, interval)) => (name, interval.to_string()),
        None => (raw, LATEST_SPEC.to_string()),
    };

    if !is_valid_identifier(raw_name) {
        return Err(PackageError::InvalidIdentifier(raw.to_string()));
    }

    let (source, name) = classify_source(raw_name);
    Ok(DependencyRequest::new(name, spec, source))
}

/// The manifest key a request is written back under; git requests keep
/// their source-qualifying prefix so a later resolution classifies them
/// the same way.
fn manifest_key(request: &DependencyRequest) -> String {
    match request.source {
        PackageSource::Registry => request.name.clone(),
        PackageSource::Git => format!("github/{}", request.name),
    }
}

pub struct InstallManager {
    registry: RegistryClient,
    cache: CacheIndex,
    project_dir: PathBuf,
}

impl InstallManager {
    #[must_use]
    pub fn new(project_dir: &Path) -> Self {
        Self::with_cache_dir(project_dir, cairn_cache::default_cache_dir())
    }

    #[must_use]
    pub fn with_cache_dir(project_dir: &Path, cache_dir: PathBuf) -> Self {
        Self {
            registry: RegistryClient::new(),
            cache: CacheIndex::new(cache_dir, project_dir.join(DEPS_DIR_NAME)),
            project_dir: project_dir.to_path_buf(),
        }
    }

    pub fn install(&self, args: &[String], options: &InstallOptions) -> Result<()> {
        self.install_with_provider(&self.registry, args, options)
    }

    pub fn install_with_provider<P: DependencyProvider>(
        &self,
        provider: &P,
        args: &[String],
        options: &InstallOptions,
    ) -> Result<()> {
        let quiet = options.quiet;
        let verbose = options.verbose && !quiet;

        self.cache.ensure_roots()?;

        let mut manifest = read_manifest(&self.project_dir)
            .map_err(|e| PackageError::ManifestError(e.to_string()))?;
        let mut timestamp = manifest_timestamp(&self.project_dir)
            .map_err(|e| PackageError::ManifestError(e.to_string()))?;

        let lock_path = self.project_dir.join(LOCKFILE_NAME);

        // Explicit arguments bypass the lock entirely; otherwise the lock
        // is trusted whenever its timestamp matches the manifest's.
        let mut resolved = Resolved::default();
        let mut load_lock = false;
        if args.is_empty() {
            if let Some(locked) = CairnLock::load(&lock_path, &timestamp)
                .map_err(|e| PackageError::LockfileError(e.to_string()))?
            {
                resolved = Resolved::from_tree(convert::locked_to_tree(&locked)?);
                load_lock = true;
            }
        }

        let mut requests = Vec::new();
        for arg in args {
            requests.push(parse_arg_package(arg)?);
        }
        if !load_lock {
            if let Some(deps) = &manifest.deps {
                requests.extend(requests_from_deps_table(deps)?);
            } else if args.is_empty() {
                return Err(PackageError::ManifestKeyMissing);
            }
        }

        if !quiet {
            cairn_logger::status("Resolving dependencies...");
        }
        if !load_lock {
            let resolver = Resolver::new(provider, &self.cache);
            resolved = resolver.resolve(&requests)?;
        }

        if !quiet {
            cairn_logger::status("Fetching...");
        }
        self.fetch_packages(&resolved, quiet, verbose)?;

        // A pinned `latest` becomes a two-sided interval in the manifest;
        // explicit argument constraints are recorded as given.
        let mut fix_manifest = false;
        for request in &requests {
            if request.source == PackageSource::Registry && request.spec == LATEST_SPEC {
                if let Some(package) = resolved.flat.get(&request.name) {
                    let interval = cairn_semver::pin_to_interval(&package.version)?;
                    manifest.set_dep_interval(&manifest_key(request), &interval);
                    fix_manifest = true;
                }
            }
        }
        if !args.is_empty() {
            fix_manifest = true;
            for request in &requests {
                if request.spec == LATEST_SPEC {
                    continue;
                }
                match request.source {
                    PackageSource::Registry => {
                        manifest.set_dep_interval(&manifest_key(request), &request.spec);
                    }
                    PackageSource::Git => {
                        manifest.set_dep_tag(&manifest_key(request), &request.spec);
                    }
                }
            }
        }
        if fix_manifest {
            write_manifest(&self.project_dir, &manifest)
                .map_err(|e| PackageError::ManifestError(e.to_string()))?;
            timestamp = manifest_timestamp(&self.project_dir)
                .map_err(|e| PackageError::ManifestError(e.to_string()))?;
        }

        if !load_lock {
            CairnLock::new(timestamp, convert::tree_to_locked(&resolved.tree))
                .save(&lock_path)
                .map_err(|e| PackageError::LockfileError(e.to_string()))?;
        }

        if !quiet {
            cairn_logger::finish("Done");
        }
        Ok(())
    }

    /// Materialize every flat entry: skip what is installed, copy what is
    /// cached, download or clone the rest. Fetch failures are reported per
    /// package and do not abort the remainder.
    fn fetch_packages(&self, resolved: &Resolved, quiet: bool, verbose: bool) -> Result<()> {
        let mut exists_count = 0usize;

        for (name, package) in &resolved.flat {
            let cache_key = to_cache_key(package.source, name, &package.version);
            let current_key = to_current_key(package.source, name, &package.version);
            let is_cached = self.cache.exists_in_cache(&cache_key);

            if verbose {
                println!(
                    "NAME: {name}\n  VERSION: {}\n  SOURCE: {}\n  CACHE_KEY: {cache_key}\n  CURRENT_KEY: {current_key}\n  IS_CACHED: {is_cached}\n",
                    package.version, package.source
                );
            }

            if self.cache.exists_installed(&current_key) {
                exists_count += 1;
                continue;
            }

            let fetched = if is_cached {
                true
            } else {
                match package.source {
                    PackageSource::Registry => {
                        self.download_registry_archive(name, &package.version, &cache_key)
                    }
                    PackageSource::Git => clone_repository(
                        name,
                        &package.version,
                        &self.cache.cache_path(&cache_key),
                    ),
                }
            };

            let installed =
                fetched && self.cache.copy_to_installed(&cache_key, &current_key).is_ok();
            if !quiet {
                report_install_status(installed, name, &package.version, package.source);
            }
        }

        if exists_count == resolved.flat.len() && !resolved.flat.is_empty() {
            cairn_logger::warn("Already installed");
        }
        Ok(())
    }

    fn download_registry_archive(&self, name: &str, version: &str, cache_key: &str) -> bool {
        let archive = self.cache.cache_dir().join(format!("{cache_key}.tar.gz"));
        self.registry.fetch_archive(name, version, &archive).is_ok()
            && self.cache.extract_archive(&archive, cache_key).is_ok()
    }
}

fn report_install_status(ok: bool, name: &str, version: &str, source: PackageSource) {
    let status = format!("{name} {version} (from: {source})");
    if ok {
        cairn_logger::success(&format!("Fetched {status}"));
    } else {
        cairn_logger::error(&format!("Failed to fetch {status}"));
    }
}
