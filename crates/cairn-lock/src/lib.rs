//! `cairn.lock`: a persisted resolution snapshot.
//!
//! The lock stores the manifest's last-write timestamp next to the resolved
//! dependency tree. A later run may reuse the tree only when its own
//! timestamp is exactly equal to the stored one; any manifest touch
//! invalidates the lock.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

const HEADER: &str = "# Please do not edit this file.\n";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LockedPackage {
    pub version: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, LockedPackage>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CairnLock {
    pub timestamp: String,
    pub dependencies: IndexMap<String, LockedPackage>,
}

impl CairnLock {
    #[must_use]
    pub fn new(timestamp: String, dependencies: IndexMap<String, LockedPackage>) -> Self {
        Self {
            timestamp,
            dependencies,
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let body = toml::to_string(self).map_err(io::Error::other)?;
        fs::write(path, format!("{HEADER}{body}"))
    }

    /// The stored tree, when the lock exists and its timestamp matches
    /// `timestamp` exactly. A missing file or a mismatched timestamp is a
    /// normal "resolve from scratch" signal, not an error; a file that no
    /// longer parses is an error.
    pub fn load(
        path: &Path,
        timestamp: &str,
    ) -> io::Result<Option<IndexMap<String, LockedPackage>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let lock: Self = toml::from_str(&content).map_err(io::Error::other)?;

        if lock.timestamp == timestamp {
            Ok(Some(lock.dependencies))
        } else {
            Ok(None)
        }
    }
}
