use std::fmt;
use std::str::FromStr;

use cairn_error::{PackageError, Result};

/// Where a package comes from. Closed set: adding a variant must break
/// every dispatch site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageSource {
    /// First-party registry, addressed by name and semantic version.
    Registry,
    /// Repository, addressed by `owner/repo` and a tag or ref.
    Git,
}

impl PackageSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registry => "cairn",
            Self::Git => "github",
        }
    }
}

impl fmt::Display for PackageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageSource {
    type Err = PackageError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "cairn" => Ok(Self::Registry),
            "github" => Ok(Self::Git),
            other => Err(PackageError::UnknownSource(other.to_string())),
        }
    }
}

pub fn parse_source(token: &str) -> Result<PackageSource> {
    token.parse()
}

/// `github/curl/curl` -> (Git, `curl/curl`)
/// `boost/config` -> (Registry, `boost/config`)
#[must_use]
pub fn classify_source(raw: &str) -> (PackageSource, String) {
    match raw.strip_prefix("github/") {
        Some(rest) => (PackageSource::Git, rest.to_string()),
        None => (PackageSource::Registry, raw.to_string()),
    }
}

/// Accepted identifier charset: lowercase letters, digits, `-`, `_`, `/`.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '/'))
}
