//! `caseflow run` command handler

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use caseflow_core::config::CaseflowConfig;
use caseflow_core::suite::{SuiteReport, SuiteRunner, SuiteSpec};
use caseflow_core::types::TestStatus;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `run` command.
///
/// The test set runs on a blocking thread; config and report I/O stay on the
/// async runtime.
///
/// # Errors
///
/// Returns `CliError::SuiteFailed` when at least one case failed, after the
/// report has been rendered and written. A report file that cannot be written
/// is returned as an error, but only after the results have been rendered.
pub async fn execute(
    args: RunArgs,
    mut config: CaseflowConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let suite = SuiteSpec::load(&args.suite).await?;
    if args.stop_on_failure {
        config.runner.stop_on_failure = true;
    }
    let report_dir = args.report_dir.clone().or_else(|| {
        (!config.report.output_dir.is_empty()).then(|| PathBuf::from(&config.report.output_dir))
    });

    info!(
        suite = %suite.name,
        path = %args.suite.display(),
        cases = suite.cases.len(),
        stop_on_failure = config.runner.stop_on_failure,
        "running test set"
    );

    let config = Arc::new(config);
    let report = tokio::task::spawn_blocking(move || -> Result<SuiteReport, CliError> {
        let registry = super::builtin_registry()?;
        Ok(SuiteRunner::new(&registry, config).run(&suite))
    })
    .await
    .map_err(|e| CliError::Command(format!("test set execution aborted: {e}")))??;

    let mut write_error = None;
    let report_path = match report_dir {
        Some(dir) => match report.write_json(&dir).await {
            Ok(path) => Some(path.display().to_string()),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to write report file");
                write_error = Some(e);
                None
            }
        },
        None => None,
    };

    let output = RunOutput {
        report_path,
        report,
    };
    writer.render(&output)?;

    if let Some(e) = write_error {
        return Err(e.into());
    }
    if output.report.is_success() {
        Ok(())
    } else {
        Err(CliError::SuiteFailed {
            failed: output.report.summary.failed,
            total: output.report.summary.total,
        })
    }
}

/// Result of a `run` invocation.
#[derive(Serialize)]
pub struct RunOutput {
    #[serde(flatten)]
    pub report: SuiteReport,
    /// Written JSON report, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
}

impl Render for RunOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let report = &self.report;
        writeln!(w, "Test set: {} (run {})", report.name.bold(), report.run_id)?;
        writeln!(
            w,
            "{:<10} {:<36} {:<8} {:>9}  Summary",
            "ID", "Name", "Status", "Elapsed"
        )?;
        writeln!(w, "{}", "-".repeat(96))?;

        for result in &report.results {
            let status = match result.status {
                TestStatus::Passed => result.status.as_str().green(),
                TestStatus::Failed => result.status.as_str().red(),
                TestStatus::Skipped | TestStatus::NotRun => result.status.as_str().yellow(),
            };
            writeln!(
                w,
                "{:<10} {:<36} {:<8} {:>8.2}s  {}",
                result.id,
                truncate(&result.name, 36),
                status,
                result.elapsed.as_secs_f64(),
                result.summary()
            )?;
            if let Some(err) = &result.teardown_error {
                writeln!(w, "{:<10} {}", "", format!("tear down: {err}").dimmed())?;
            }
        }

        writeln!(w)?;
        let summary = &report.summary;
        writeln!(
            w,
            "Total: {}  Passed: {}  Failed: {}  Skipped: {}  ({:.2}s)",
            summary.total.to_string().bold(),
            summary.passed.to_string().green(),
            summary.failed.to_string().red(),
            summary.skipped.to_string().yellow(),
            report.elapsed.as_secs_f64()
        )?;
        if let Some(path) = &self.report_path {
            writeln!(w, "Report: {path}")?;
        }
        Ok(())
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
