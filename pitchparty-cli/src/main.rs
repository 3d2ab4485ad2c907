//! PitchParty CLI - Command-line interface
//!
//! This binary drives the PitchParty content engine: it keeps the prefetch
//! cache warm, draws single bundles and manages the configuration file.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::run::RunArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "pitchparty")]
#[command(version = pitchparty::VERSION)]
#[command(about = "Prefetching content engine for the PitchParty party game", long_about = None)]
struct Cli {
    /// Path to the configuration file (default: ~/.pitchparty/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the preloader and keep the cache warm until Ctrl-C
    Run {
        /// Seconds between cache status reports
        #[arg(long, default_value = "30")]
        status_interval: u64,

        /// Do not start the background preloader
        #[arg(long)]
        no_preload: bool,
    },

    /// Produce one bundle and print it as JSON
    Draw,

    /// Generate bundles into the cache and print the resulting status
    Fill {
        /// Number of bundles to generate
        #[arg(long, default_value = "1")]
        count: usize,
    },

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli).await {
        e.exit();
    }
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Config(command) => commands::config::run(command, config_path),
        Commands::Run {
            status_interval,
            no_preload,
        } => {
            let runner = CliRunner::new(config_path)?;
            commands::run::run(
                runner,
                RunArgs {
                    status_interval,
                    no_preload,
                },
            )
            .await
        }
        Commands::Draw => commands::draw::run(CliRunner::new(config_path)?).await,
        Commands::Fill { count } => commands::fill::run(CliRunner::new(config_path)?, count).await,
    }
}
