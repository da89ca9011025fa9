pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = "A package manager for compiled libraries";
pub const REPOSITORY_URL: &str = "https://github.com/cairnpkg/cairn";
pub const BIN_NAME: &str = "cairn";

pub const USER_AGENT: &str = "cairn/0.1.0";
pub const MAX_ATTEMPTS: u32 = 4;

/// Metadata API root, e.g. `{REGISTRY_HOST}/packages/{name}/versions`.
pub const REGISTRY_HOST: &str = "https://api.cairnpkg.dev";
/// Pre-built archive storage, addressed by cache key.
pub const STORAGE_HOST: &str = "https://archives.cairnpkg.dev";
pub const GITHUB_HOST: &str = "https://github.com";

pub const MANIFEST_FILE: &str = "cairn.toml";
pub const LOCKFILE_NAME: &str = "cairn.lock";
pub const DEPS_DIR_NAME: &str = "deps";
