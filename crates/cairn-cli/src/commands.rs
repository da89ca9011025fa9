use clap::{Parser, Subcommand};

use cairn_constants::{BIN_NAME, DESCRIPTION, REPOSITORY_URL, VERSION};

#[derive(Parser)]
#[command(name = BIN_NAME)]
#[command(version = VERSION)]
#[command(propagate_version = true)]
#[command(about = DESCRIPTION, long_about = None)]
#[command(after_help = REPOSITORY_URL)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Installs dependencies from cairn.toml, or the given packages
    #[command(alias = "i")]
    Install {
        /// Packages to install (e.g. fmt, boost/config=1.66.0,
        /// github/curl/curl=7_61_0)
        #[arg()]
        packages: Vec<String>,
        /// Print per-package cache diagnostics
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
        /// Print errors only
        #[arg(short = 'q', long = "quite", alias = "quiet")]
        quite: bool,
    },
}
