mod commands;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use logsift::cli::{Cli, Commands, ConfigCommands};

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "LOGSIFT_LOG";

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Filter(args) => commands::filter::handle(&args, cli.config.as_deref()),
        Commands::Config { action } => {
            match action {
                ConfigCommands::Show => commands::config::handle_show(cli.config.as_deref())?,
                ConfigCommands::Path => commands::config::handle_path()?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Completions { shell } => {
            commands::completions::handle(shell);
            Ok(ExitCode::SUCCESS)
        }
    }
}
