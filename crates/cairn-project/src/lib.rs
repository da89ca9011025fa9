//! Project manifest (`cairn.toml`): ordered dependency table, version/tag
//! lookup per source, and the last-write timestamp the lockfile is gated on.

pub mod io;
pub mod manifest;

pub use io::{manifest_path, manifest_timestamp, read_manifest, write_manifest};
pub use manifest::{DepDetail, DepEntry, Manifest, get_version};
