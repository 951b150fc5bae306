//! Main application entry point.

use clap::Parser;
use designdraw_app::Cli;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("running {:?}", cli.command);

    if let Err(e) = designdraw_app::run(cli) {
        log::error!("{e}");
        eprintln!("designdraw: {e}");
        std::process::exit(1);
    }
}
