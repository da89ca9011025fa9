//! On-disk package cache: existence index over the shared cache and the
//! project-local `deps` directory, plus archive materialization.

pub mod index;
pub mod materialize;

pub use index::CacheIndex;
pub use index::default_cache_dir;
