//! CLI entry point for the tile solver demo

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wavetile::io::cli::{Cli, DemoRunner};

fn main() -> wavetile::Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut runner = DemoRunner::new(cli);
    runner.run().map(|_| ())
}
