//! Command handlers -- one module per subcommand

pub mod config;
pub mod list;
pub mod run;

use std::path::{Path, PathBuf};

use caseflow_core::config::CaseflowConfig;
use caseflow_core::error::CaseflowError;
use caseflow_core::registry::TestCaseRegistry;

use crate::error::CliError;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "caseflow.toml";

/// Resolves which config file to read, if any.
///
/// An explicit path is always returned, so a missing file is reported.
/// Otherwise `./caseflow.toml` is used only when it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

/// Loads the effective configuration: file (or defaults), then env overrides,
/// then the `--log-level` flag, then validation.
pub async fn load_config(
    path: Option<&Path>,
    log_level: Option<&str>,
) -> Result<CaseflowConfig, CaseflowError> {
    let mut config = match path {
        Some(path) => CaseflowConfig::load(path).await?,
        None => {
            let mut config = CaseflowConfig::default();
            config.apply_env_overrides();
            config
        }
    };
    if let Some(level) = log_level {
        config.general.log_level = level.to_owned();
    }
    config.validate()?;
    Ok(config)
}

/// Human-readable name of the config source.
pub fn source_label(path: Option<&Path>) -> String {
    path.map_or_else(|| "(defaults)".to_owned(), |p| p.display().to_string())
}

/// Registry holding every scenario this binary ships with.
pub fn builtin_registry() -> Result<TestCaseRegistry, CliError> {
    let mut registry = TestCaseRegistry::new();
    caseflow_scenarios::register_builtin(&mut registry)?;
    Ok(registry)
}
