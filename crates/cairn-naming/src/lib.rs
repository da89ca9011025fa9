//! Idempotent package naming.
//!
//! Cache names identify one version of a package in the shared cache
//! (`opencv-3.4.2`, `boost-config-1.66.0`); current names identify a package
//! inside a project's `deps` directory, version-agnostic (`opencv`,
//! `boost-config`). Every function here is pure.

pub mod keys;
pub mod source;

pub use keys::{
    basename, cache_key_to_current_key, slash_to_hyphen, to_cache_key, to_current_key,
};
pub use source::{PackageSource, classify_source, is_valid_identifier, parse_source};
