use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "elecciones")]
#[command(
    about = "Ask questions about the 2023 Spanish general election manifestos",
    long_about = None
)]
pub struct Cli {
    /// Question to ask (defaults to the query in the configuration)
    pub query: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "ELECCIONES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print each sub-question with the answer of its tool
    #[arg(short = 's', long)]
    pub show_sources: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
