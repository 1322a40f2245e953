//! CLI entry point for runlocal.

mod app;
mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let args = cli::Args::parse_from(cli::normalize_args(std::env::args_os()));
    init_tracing();
    let code = app::entry::run(args).await;
    std::process::exit(code);
}
