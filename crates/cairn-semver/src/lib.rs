//! Semantic-version helpers for pinning and interval rewriting.

use semver::Version;

use cairn_error::{PackageError, Result};

pub fn parse(version: &str) -> Result<Version> {
    Version::parse(version).map_err(|_| PackageError::VersionParseFailed(version.to_string()))
}

/// `1.4.2` -> `2.0.0`
pub fn bump_major(version: &str) -> Result<String> {
    let parsed = parse(version)?;
    Ok(format!("{}.0.0", parsed.major + 1))
}

/// A pinned version becomes a two-sided interval spanning its major line:
/// `6.0.0` -> `>=6.0.0 and <7.0.0`.
pub fn pin_to_interval(version: &str) -> Result<String> {
    let upper = bump_major(version)?;
    Ok(format!(">={version} and <{upper}"))
}

/// Newest stable version in a listing; pre-releases and unparsable entries
/// are skipped.
#[must_use]
pub fn latest(versions: &[String]) -> Option<String> {
    versions
        .iter()
        .filter_map(|v| Version::parse(v).ok().map(|parsed| (parsed, v)))
        .filter(|(parsed, _)| parsed.pre.is_empty())
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, v)| v.clone())
}
