use std::fmt;

#[derive(Debug)]
pub enum PackageError {
    UnknownSource(String),
    InvalidIdentifier(String),
    ManifestKeyMissing,
    ManifestError(String),
    ResolutionIo(String),
    CyclicDependency(String),
    DependencyConflict(String, String),
    VersionParseFailed(String),
    LockfileError(String),
    FetchFailed(String, String),
    IoError(String),
}

impl fmt::Display for PackageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSource(src) => {
                write!(f, "cairn.toml error\nWhat source is {src}?")
            }
            Self::InvalidIdentifier(spec) => {
                write!(f, "Invalid package identifier: {spec}")
            }
            Self::ManifestKeyMissing => {
                write!(
                    f,
                    "Required key `deps` does not exist in cairn.toml.\n\
                     Please refer to https://docs.cairnpkg.dev"
                )
            }
            Self::ManifestError(msg) => {
                write!(f, "cairn.toml error: {msg}")
            }
            Self::ResolutionIo(msg) => {
                write!(f, "Failed to resolve dependencies: {msg}")
            }
            Self::CyclicDependency(key) => {
                write!(f, "Cyclic dependency detected at {key}")
            }
            Self::DependencyConflict(name, details) => {
                write!(f, "Dependency conflict for '{name}': {details}")
            }
            Self::VersionParseFailed(version) => {
                write!(f, "Could not parse version: {version}")
            }
            Self::LockfileError(msg) => {
                write!(f, "Lockfile error: {msg}")
            }
            Self::FetchFailed(name, version) => {
                write!(f, "Failed to fetch {name} {version}")
            }
            Self::IoError(msg) => {
                write!(f, "IO error: {msg}")
            }
        }
    }
}

impl std::error::Error for PackageError {}

impl From<anyhow::Error> for PackageError {
    fn from(err: anyhow::Error) -> Self {
        Self::ResolutionIo(err.to_string())
    }
}

impl From<std::io::Error> for PackageError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PackageError>;
