//! fod-dynconf - dynamic scan configuration report for Fortify on Demand

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod output;
mod report;

use cli::Cli;
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug);

    cli::report::run(&cli).await
}

/// Send diagnostics to stderr; `RUST_LOG` takes precedence over `--debug`
fn init_logging(debug: bool) {
    let default_filter = if debug { "fod_dynconf=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .init();
}
