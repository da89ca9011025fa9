use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use anyhow::Context;

use crate::manifest::Manifest;
use cairn_constants::MANIFEST_FILE;

#[must_use]
pub fn manifest_path(project_dir: &Path) -> PathBuf {
    project_dir.join(MANIFEST_FILE)
}

pub fn read_manifest(project_dir: &Path) -> anyhow::Result<Manifest> {
    let path = manifest_path(project_dir);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("{} does not exist", path.display()))?;
    let parsed: Manifest = toml::from_str(&content)?;
    Ok(parsed)
}

pub fn write_manifest(project_dir: &Path, manifest: &Manifest) -> anyhow::Result<()> {
    let content = toml::to_string(manifest)?;
    fs::write(manifest_path(project_dir), content)?;
    Ok(())
}

/// Manifest last-write time, seconds since the epoch, as a string. The
/// lockfile compares this for exact equality.
pub fn manifest_timestamp(project_dir: &Path) -> anyhow::Result<String> {
    let path = manifest_path(project_dir);
    let metadata = fs::metadata(&path)
        .with_context(|| format!("{} does not exist", path.display()))?;
    let modified = metadata.modified()?;
    let secs = modified.duration_since(UNIX_EPOCH)?.as_secs();
    Ok(secs.to_string())
}
