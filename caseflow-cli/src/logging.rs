//! Logging initialization for the caseflow CLI.
//!
//! Configures `tracing-subscriber` from the `[general]` section of
//! `CaseflowConfig`. Log lines go to stderr so that stdout carries only
//! command output. With `general.log_file` set, every line is also appended
//! to that file without ANSI colors.
//!
//! Panics raised inside test cases are caught by the runner, so the default
//! panic hook would only add a stray "thread panicked" note to stderr.
//! [`install_panic_hook`] reports them as tracing events instead.

use std::fs::{File, OpenOptions};
use std::panic::Location;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use caseflow_core::config::GeneralConfig;
use caseflow_core::runner::panic_message;

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `RUST_LOG` wins over `config.log_level`.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable colored output
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let log_file = open_log_file(&config.log_file)?;

    match config.log_format.as_str() {
        "json" => {
            let file_layer = log_file.map(|file| {
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(file)
            });
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .with(file_layer)
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        "pretty" => {
            let file_layer = log_file.map(|file| {
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(file)
            });
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .with(file_layer)
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)
                })?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                config.log_format
            ));
        }
    }

    Ok(())
}

/// Replace the default panic hook with one that logs through `tracing`.
///
/// Call after [`init_tracing`] so the event reaches the configured layers.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(
            panic = %panic_message(info.payload()),
            location = %location_label(info.location()),
            "panic"
        );
    }));
}

fn location_label(location: Option<&Location<'_>>) -> String {
    location
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Opens `path` for appending. An empty path disables file logging.
fn open_log_file(path: &str) -> Result<Option<Arc<File>>> {
    if path.is_empty() {
        return Ok(None);
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file '{path}'"))?;
    Ok(Some(Arc::new(file)))
}
