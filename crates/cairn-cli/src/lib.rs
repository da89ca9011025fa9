pub mod commands;
pub mod handlers;

use clap::Parser;

use commands::{Cli, Commands};
use handlers::InstallHandler;

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Install {
            packages,
            verbose,
            quite,
        } => InstallHandler::run(packages, *verbose, *quite),
    }
}
