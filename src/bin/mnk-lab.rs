//! mnk-lab CLI - enumerate, sample and compare policies on M,N,K games
//!
//! Logging goes to stderr and honours `RUST_LOG` (default `info`).

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mnk-lab")]
#[command(version, about = "State enumeration and policy comparison for M,N,K games", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate every reachable state and summarise the labels
    Enumerate(mnk_lab::cli::commands::enumerate::EnumerateArgs),

    /// Draw states that satisfy predicates
    Sample(mnk_lab::cli::commands::sample::SampleArgs),

    /// Compare policies from an experiment file
    Compare(mnk_lab::cli::commands::compare::CompareArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Enumerate(args) => mnk_lab::cli::commands::enumerate::execute(args),
        Commands::Sample(args) => mnk_lab::cli::commands::sample::execute(args),
        Commands::Compare(args) => mnk_lab::cli::commands::compare::execute(args),
    }
}
