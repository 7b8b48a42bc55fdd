use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dodger_cli::{commands, logging};

#[derive(Parser)]
#[command(version, about = "Arena hazard overlay engine, headless host")]
struct Cli {
    /// Debug logging for dodger crates (same as DEBUG_LOGGING=1)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a frame scenario through the engine
    Run {
        path: PathBuf,
        /// Use this config file instead of the scenario's inline settings
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print every draw call
        #[arg(long)]
        echo: bool,
    },
    /// Validate arena definition files
    Check { paths: Vec<PathBuf> },
    /// List the arena stages known to the configuration
    Arenas {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show the configuration file and its values
    Config,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match &cli.command {
        Commands::Run { path, config, echo } => {
            commands::run_scenario(path, config.as_ref(), *echo).await
        }
        Commands::Check { paths } => commands::check_definitions(paths),
        Commands::Arenas { config } => commands::list_arenas(config.as_ref()),
        Commands::Config => commands::show_config(),
    }
}
