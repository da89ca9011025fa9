use anyhow::Result;
use owo_colors::OwoColorize;

pub struct InstallHandler;

impl InstallHandler {
    pub fn run(packages: &[String], verbose: bool, quite: bool) -> Result<()> {
        cairn_logger::init_logger(quite);

        if !quite {
            Self::print_header(packages);
        }

        cairn_core::install(".", packages, quite, verbose)
    }

    fn print_header(packages: &[String]) {
        let package_list = packages.join(" ");
        println!(
            "{} {} {}",
            "cairn".bright_cyan().bold(),
            "install".bright_white(),
            package_list.bright_white()
        );
        println!();
    }
}
