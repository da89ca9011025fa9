pub mod convert;
pub mod install;

pub use install::{InstallManager, InstallOptions, parse_arg_package};

use std::path::Path;

/// Run a full install against the default cache root.
pub fn install(project_dir: &str, args: &[String], quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let manager = InstallManager::new(Path::new(project_dir));
    manager
        .install(args, &InstallOptions { quiet, verbose })
        .map_err(|e| anyhow::anyhow!(e))
}
