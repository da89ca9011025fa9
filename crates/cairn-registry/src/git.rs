use std::path::Path;
use std::process::{Command, Stdio};

use cairn_constants::GITHUB_HOST;

/// `curl/curl` -> `https://github.com/curl/curl.git`
#[must_use]
pub fn repository_url(name: &str) -> String {
    format!("{GITHUB_HOST}/{name}.git")
}

/// Shallow-clone one tag into `dest`. Returns whether the clone succeeded;
/// the installer reports failures per package and keeps going.
#[must_use]
pub fn clone_repository(name: &str, tag: &str, dest: &Path) -> bool {
    Command::new("git")
        .args(["clone", "--depth", "1", "--branch", tag])
        .arg(repository_url(name))
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
