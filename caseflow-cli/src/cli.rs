//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// caseflow -- run test sets through the setup / run / tear down lifecycle.
///
/// Use `caseflow <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "caseflow", version, about, long_about = None)]
pub struct Cli {
    /// Path to the caseflow.toml configuration file.
    ///
    /// Without this flag, ./caseflow.toml is used when it exists and
    /// built-in defaults otherwise.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a test set file.
    Run(RunArgs),

    /// List registered scenario kinds.
    List,

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- run ----

/// Run every case of a test set in order.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Test set file (TOML).
    pub suite: PathBuf,

    /// Skip remaining cases after the first failure.
    #[arg(long)]
    pub stop_on_failure: bool,

    /// Write the JSON report into this directory (overrides report.output_dir).
    #[arg(long)]
    pub report_dir: Option<PathBuf>,
}

// ---- config ----

/// Manage caseflow configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, runner, report, metrics, settings).
        #[arg(long)]
        section: Option<String>,
    },
}
