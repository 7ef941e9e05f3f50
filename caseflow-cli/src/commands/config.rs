//! `caseflow config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use caseflow_core::config::CaseflowConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Sections accepted by `config show --section`.
const SECTIONS: [&str; 5] = ["general", "runner", "report", "metrics", "settings"];

/// Key fragments whose values are hidden in `config show`.
const SECRET_MARKERS: [&str; 4] = ["password", "secret", "token", "key"];

const REDACTED: &str = "***REDACTED***";

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Loads and validates the configuration, reporting any errors.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails.
async fn execute_validate(
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = super::source_label(config_path);
    info!(source = %source, "validating configuration");

    let report = match super::load_config(config_path, None).await {
        Ok(_) => ConfigValidationReport {
            source,
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source,
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Displays the effective configuration with secret-looking settings redacted.
///
/// # Errors
///
/// Returns the load error, or `CliError::Command` for an unknown section name.
async fn execute_show(
    config_path: Option<&Path>,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = super::source_label(config_path);
    info!(source = %source, "loading configuration");

    let mut config = super::load_config(config_path, None).await?;
    redact_settings(&mut config.settings);

    let config_toml = match section.as_deref() {
        None => toml::to_string_pretty(&config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("runner") => toml::to_string_pretty(&config.runner),
        Some("report") => toml::to_string_pretty(&config.report),
        Some("metrics") => toml::to_string_pretty(&config.metrics),
        Some("settings") => toml::to_string_pretty(&config.settings),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: {})",
                other,
                SECTIONS.join(", ")
            )));
        }
    }
    .unwrap_or_else(|e| format!("(serialization error: {})", e));

    let report = ConfigReport {
        source,
        section,
        config_toml,
    };
    writer.render(&report)?;

    Ok(())
}

/// Replaces values of secret-looking keys, at any depth, with a marker.
fn redact_settings(table: &mut toml::Table) {
    for (key, value) in table.iter_mut() {
        let lowered = key.to_ascii_lowercase();
        if SECRET_MARKERS.iter().any(|m| lowered.contains(m)) {
            *value = toml::Value::String(REDACTED.to_owned());
        } else if let toml::Value::Table(inner) = value {
            redact_settings(inner);
        }
    }
}

/// Configuration display report.
///
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration source (file path or "(defaults)")
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Serialized TOML configuration (with redacted settings)
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration source
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_settings_hides_nested_secrets() {
        let mut config = CaseflowConfig::parse(
            r#"
[settings.sql]
server = "db01"
username = "sa"
password = "hunter2"

[settings.cloud]
api_token = "abc"
"#,
        )
        .unwrap();
        redact_settings(&mut config.settings);

        assert_eq!(config.setting_str("sql.server"), Some("db01"));
        assert_eq!(config.setting_str("sql.username"), Some("sa"));
        assert_eq!(config.setting_str("sql.password"), Some(REDACTED));
        assert_eq!(config.setting_str("cloud.api_token"), Some(REDACTED));
    }

    #[test]
    fn validation_report_text_lists_errors() {
        let report = ConfigValidationReport {
            source: "caseflow.toml".to_owned(),
            valid: false,
            errors: vec!["invalid config value for 'general.log_level'".to_owned()],
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("INVALID"));
        assert!(text.contains("general.log_level"));
    }

    #[test]
    fn config_report_json_skips_toml_body() {
        let report = ConfigReport {
            source: "(defaults)".to_owned(),
            section: Some("runner".to_owned()),
            config_toml: "stop_on_failure = false\n".to_owned(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["section"], "runner");
        assert!(value.get("config_toml").is_none());
    }
}
