use clap::Parser;
use crcr_suggester::{Cli, Run};
use tracing::error;

fn main() {
    tracing_subscriber::fmt::init();

    // malformed arguments exit here with the usage message
    let cli = Cli::parse();

    if let Err(e) = Run::run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
