mod catalog;
mod cli;
mod execution;
mod http;
mod logging;
mod scaffold;
mod state;
mod types;

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Commands, NewArgs};
use crate::types::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_override = if cli.log_level.is_some() || cli.verbose || cli.quiet {
        Some(cli.log_level_to_str())
    } else {
        None
    };

    crate::logging::init(log_level_override, cli.log_format_override())?;

    info!("Starting codelab");

    match cli.command.clone().unwrap_or(Commands::New(NewArgs::default())) {
        Commands::New(args) => cli::run_scaffold(&cli, args).await,
        Commands::Serve(args) => cli::run_server(&cli, args).await,
        Commands::Validate => cli::validate(&cli).await,
        Commands::Version => cli::show_version().await,
    }
}
