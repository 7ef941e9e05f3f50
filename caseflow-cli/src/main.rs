//! caseflow CLI entry point.
//!
//! Parses arguments, loads the configuration, installs logging and
//! dispatches to a command handler. Errors are printed to stderr and mapped
//! to exit codes by [`CliError::exit_code`].

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use caseflow_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            let code = u8::try_from(e.exit_code()).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let config_path = commands::resolve_config_path(cli.config.as_deref());

    // `config` must be able to report a broken config file, so it starts from default logging
    let command = match cli.command {
        Commands::Config(args) => {
            let general = GeneralConfig {
                log_level: cli
                    .log_level
                    .unwrap_or_else(|| GeneralConfig::default().log_level),
                ..GeneralConfig::default()
            };
            init_logging(&general)?;
            return commands::config::execute(args, config_path.as_deref(), &writer).await;
        }
        command => command,
    };

    let config = commands::load_config(config_path.as_deref(), cli.log_level.as_deref()).await?;
    init_logging(&config.general)?;
    if config.metrics.enabled {
        caseflow_core::metrics::describe_all();
    }

    tracing::debug!(
        config = %commands::source_label(config_path.as_deref()),
        "caseflow starting"
    );

    match command {
        Commands::Run(args) => commands::run::execute(args, config, &writer).await,
        Commands::List => commands::list::execute(&writer),
        Commands::Config(_) => Ok(()),
    }
}

fn init_logging(general: &GeneralConfig) -> Result<(), CliError> {
    logging::init_tracing(general)
        .map_err(|e| CliError::Command(format!("failed to initialize logging: {e:#}")))?;
    logging::install_panic_hook();
    Ok(())
}
