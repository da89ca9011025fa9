use std::io;
use std::path::{Path, PathBuf};

use cairn_constants::MANIFEST_FILE;

/// Answers "is this key already materialized?" against two roots: the
/// shared download cache and the project's installed-dependency directory.
/// Both roots are injected so tests can point them at temporary
/// directories. No locking; one invocation at a time owns the disk.
pub struct CacheIndex {
    cache_dir: PathBuf,
    deps_dir: PathBuf,
}

/// Shared cache under the user's home, `~/.cairn/cache`.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir().unwrap().join(".cairn").join("cache")
}

impl CacheIndex {
    #[must_use]
    pub fn new(cache_dir: PathBuf, deps_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            deps_dir,
        }
    }

    pub fn ensure_roots(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.cache_dir)?;
        std::fs::create_dir_all(&self.deps_dir)?;
        Ok(())
    }

    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    #[must_use]
    pub fn deps_dir(&self) -> &Path {
        &self.deps_dir
    }

    #[must_use]
    pub fn cache_path(&self, cache_key: &str) -> PathBuf {
        self.cache_dir.join(cache_key)
    }

    #[must_use]
    pub fn installed_path(&self, current_key: &str) -> PathBuf {
        self.deps_dir.join(current_key)
    }

    #[must_use]
    pub fn exists_in_cache(&self, cache_key: &str) -> bool {
        self.cache_path(cache_key).is_dir()
    }

    #[must_use]
    pub fn exists_installed(&self, current_key: &str) -> bool {
        self.installed_path(current_key).is_dir()
    }

    /// Manifest inside a cache entry, when the entry carries one. Lets the
    /// resolver discover transitive dependencies without a network round
    /// trip.
    #[must_use]
    pub fn cached_manifest_path(&self, cache_key: &str) -> Option<PathBuf> {
        let path = self.cache_path(cache_key).join(MANIFEST_FILE);
        path.is_file().then_some(path)
    }
}
