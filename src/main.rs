use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use elecciones::cli::Cli;
use elecciones::service::{ask, AskOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG 优先于 -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    ask(AskOptions {
        query: cli.query,
        config_path: cli.config,
        show_sources: cli.show_sources,
    })
    .await
}
