fn main() {
    if let Err(err) = cairn_cli::run_cli() {
        cairn_logger::error(&err.to_string());
        std::process::exit(1);
    }
}
